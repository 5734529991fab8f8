//! # Mode Controller
//!
//! Máquina de estados de dois modos exposta ao display service.
//!
//! ```text
//!             enter_linear_mode()
//!   ┌────────┐ ───────────────────▶ ┌─────────────┐
//!   │ Legacy │                      │ Linear1080p │
//!   └────────┘ ◀─────────────────── └─────────────┘
//!             revert_to_vga_mode()
//!
//!   Transitioning: guard transitório, só existe durante program().
//! ```
//!
//! ## Garantias
//!
//! - No máximo UMA programação em voo por dispositivo. Um segundo chamador
//!   falha na hora com `InvalidStateTransition` (não bloqueia).
//! - Pedido a partir do estado errado não toca no hardware.
//! - Falha de programação devolve o estado a `Legacy`. Os registradores
//!   ficam como foram escritos; uma nova tentativa reprograma tudo do zero.

use super::geometry::DisplayGeometry;
use super::probe::{self, DeviceDescription};
use super::programmer;
use super::regs;
use super::timing::{self, ProfileName, TimingProfile};
use super::window::{FrameMemoryWindow, IoCache, RegisterAccess, RegisterWindow};
use crate::core::config::PollPolicy;
use crate::sys::{AttachError, ProgrammingError};
use core::sync::atomic::{AtomicU8, Ordering};
use spin::Mutex;

// =============================================================================
// ESTADOS
// =============================================================================

/// Modo corrente do VTC.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// VGA de boot (estado inicial após attach)
    Legacy = 0,
    /// Framebuffer linear 1920x1080
    Linear1080p = 1,
    /// Programação em curso
    Transitioning = 2,
}

impl DisplayMode {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Legacy,
            1 => Self::Linear1080p,
            _ => Self::Transitioning,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => ProfileName::Legacy.as_str(),
            Self::Linear1080p => ProfileName::P1080.as_str(),
            Self::Transitioning => "transitioning",
        }
    }
}

/// De onde vem o timing usado no revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacySource {
    /// Lido do hardware no attach
    Captured,
    /// Tabela `timing::LEGACY`
    Static,
}

// =============================================================================
// TRANSITION GUARD
// =============================================================================

/// Segura o estado em `Transitioning`. Sem `finish`, volta a `Legacy` no drop.
struct TransitionGuard<'a> {
    mode: &'a AtomicU8,
    finished: bool,
}

impl<'a> TransitionGuard<'a> {
    fn begin(mode: &'a AtomicU8, from: DisplayMode) -> Result<Self, ProgrammingError> {
        match mode.compare_exchange(
            from as u8,
            DisplayMode::Transitioning as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => Ok(Self {
                mode,
                finished: false,
            }),
            Err(observed) => Err(ProgrammingError::InvalidStateTransition {
                from: DisplayMode::from_u8(observed),
            }),
        }
    }

    fn finish(mut self, to: DisplayMode) {
        self.mode.store(to as u8, Ordering::Release);
        self.finished = true;
    }
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.mode.store(DisplayMode::Legacy as u8, Ordering::Release);
        }
    }
}

/// Timing capturado com a área visível do modo linear?
fn is_linear_timing(profile: &TimingProfile) -> bool {
    profile.h_display == timing::P1080.h_display && profile.v_display == timing::P1080.v_display
}

// =============================================================================
// DEVICE STATE
// =============================================================================

/// Estado do driver para uma placa anexada. Existe do attach ao detach.
pub struct NextDimension<A: RegisterAccess> {
    slot: u8,
    mode: AtomicU8,
    regs: Mutex<RegisterWindow<A>>,
    vram: FrameMemoryWindow,
    /// Timing encontrado no hardware no attach, se coerente
    captured_legacy: Option<TimingProfile>,
    policy: PollPolicy,
}

impl<A: RegisterAccess> NextDimension<A> {
    /// Anexa a placa descrita por `desc` usando as janelas já mapeadas.
    pub fn attach(
        desc: DeviceDescription,
        mut regs: RegisterWindow<A>,
        vram: FrameMemoryWindow,
    ) -> Result<Self, AttachError> {
        crate::kinfo!("(ND) Attach no slot=", desc.slot);

        if !regs::is_valid_slot(desc.slot) {
            return Err(AttachError::InvalidSlot);
        }
        if !probe::probe(&desc)
            || regs.phys_base() != desc.register_base
            || vram.phys_base() != desc.vram_base
        {
            return Err(AttachError::WindowMismatch);
        }
        if regs.cache() != IoCache::CacheOff {
            return Err(AttachError::RegisterWindowCached);
        }
        if regs.len() < regs::REGISTER_SPAN {
            return Err(AttachError::RegisterWindowTooSmall);
        }
        if vram.len() < timing::P1080.frame_bytes() {
            return Err(AttachError::FrameMemoryTooSmall);
        }
        if crate::klib::ranges_overlap(
            regs.phys_base(),
            regs.len() as u64,
            vram.phys_base(),
            vram.len() as u64,
        ) {
            return Err(AttachError::WindowsOverlap);
        }

        let captured_legacy = match programmer::capture(&mut regs) {
            // Placa deixada em 1080p (detach sem revert): não serve de modo legado
            Ok(profile) if is_linear_timing(&profile) => {
                crate::kwarn!("(ND) Hardware ainda em 1080p, usando tabela VGA");
                None
            }
            Ok(profile) if profile.is_consistent() => {
                crate::kdebug!("(ND) Timing legado capturado, H_DISPLAY=", profile.h_display);
                Some(profile)
            }
            _ => {
                crate::kwarn!("(ND) Timing do hardware incoerente, usando tabela VGA");
                None
            }
        };

        crate::kok!("(ND) Placa anexada em modo legado");
        Ok(Self {
            slot: desc.slot,
            mode: AtomicU8::new(DisplayMode::Legacy as u8),
            regs: Mutex::new(regs),
            vram,
            captured_legacy,
            policy: PollPolicy::DEFAULT,
        })
    }

    /// Substitui a política de polling do PLL.
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Desanexa a placa e devolve as janelas ao kernel para unmap.
    pub fn detach(self) -> (RegisterWindow<A>, FrameMemoryWindow) {
        if self.current_mode() == DisplayMode::Linear1080p {
            crate::kwarn!("(ND) Detach com a placa ainda em 1080p, slot=", self.slot);
        }
        crate::kinfo!("(ND) Detach do slot=", self.slot);
        (self.regs.into_inner(), self.vram)
    }

    // =========================================================================
    // TRANSIÇÕES
    // =========================================================================

    /// Legacy -> Linear1080p.
    pub fn enter_linear_mode(&self) -> Result<DisplayGeometry, ProgrammingError> {
        let profile = timing::lookup(ProfileName::P1080)?;
        self.transition(DisplayMode::Legacy, DisplayMode::Linear1080p, profile)?;

        let geometry = DisplayGeometry::from_profile(profile, &self.vram);
        crate::kinfo!("(ND) Modo linear 1080p ativo, FB=", geometry.frame_buffer_phys);
        Ok(geometry)
    }

    /// Linear1080p -> Legacy.
    pub fn revert_to_vga_mode(&self) -> Result<(), ProgrammingError> {
        let profile = match self.captured_legacy.as_ref() {
            Some(profile) => profile,
            None => timing::lookup(ProfileName::Legacy)?,
        };
        self.transition(DisplayMode::Linear1080p, DisplayMode::Legacy, profile)?;

        crate::kinfo!("(ND) Modo legado restaurado, H_DISPLAY=", profile.h_display);
        Ok(())
    }

    fn transition(
        &self,
        from: DisplayMode,
        to: DisplayMode,
        profile: &TimingProfile,
    ) -> Result<(), ProgrammingError> {
        let guard = TransitionGuard::begin(&self.mode, from).map_err(|e| {
            crate::kwarn!("(ND) Transicao rejeitada, pedido a partir de=", from as u8);
            e
        })?;

        let result = {
            let mut regs = self.regs.lock();
            programmer::program(profile, &mut regs, &self.policy)
        };

        match result {
            Ok(()) => {
                guard.finish(to);
                Ok(())
            }
            Err(e) => {
                crate::kerror!(e.as_str());
                drop(guard);
                Err(e)
            }
        }
    }

    // =========================================================================
    // CONSULTAS
    // =========================================================================

    pub fn current_mode(&self) -> DisplayMode {
        DisplayMode::from_u8(self.mode.load(Ordering::Acquire))
    }

    /// "legacy", "p1080" ou "transitioning".
    pub fn mode_name(&self) -> &'static str {
        self.current_mode().as_str()
    }

    /// Geometria ativa. `None` fora do modo linear.
    pub fn display_geometry(&self) -> Option<DisplayGeometry> {
        match self.current_mode() {
            DisplayMode::Linear1080p => {
                Some(DisplayGeometry::from_profile(&timing::P1080, &self.vram))
            }
            _ => None,
        }
    }

    pub fn slot(&self) -> u8 {
        self.slot
    }

    pub fn frame_memory(&self) -> &FrameMemoryWindow {
        &self.vram
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.policy
    }

    /// Timing que o revert vai programar.
    pub fn legacy_profile(&self) -> &TimingProfile {
        self.captured_legacy.as_ref().unwrap_or(&timing::LEGACY)
    }

    pub fn legacy_source(&self) -> LegacySource {
        match self.captured_legacy {
            Some(_) => LegacySource::Captured,
            None => LegacySource::Static,
        }
    }
}
