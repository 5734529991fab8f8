//! # Timing Profiles
//!
//! Tabelas de timing fixas para cada modo suportado.
//!
//! | Perfil   | Resolução  | Totais      | Pixel clock | bpp | Stride |
//! |----------|------------|-------------|-------------|-----|--------|
//! | `legacy` | 640x480    | 800 x 525   | 25.2 MHz    | 8   | 640    |
//! | `p1080`  | 1920x1080  | 2200 x 1125 | 148.5 MHz   | 16  | 3840   |
//!
//! `p1080` segue o CEA-861 (1080p60). 16 bpp porque 1920x1080x32 não cabe
//! nos 4 MiB de VRAM da placa.
//!
//! ## Pixel clock
//!
//! O seletor escrito em PIXEL_PLL_CTRL codifica `M/N/P` sobre o cristal de
//! 27 MHz: `f = 27 MHz * M / (N * 2^P)`.
//!
//! ```text
//! 31          18 17  16 15        8 7         0
//! ┌─────────────┬───────┬──────────┬──────────┐
//! │  Reservado  │   P   │    N     │    M     │
//! └─────────────┴───────┴──────────┴──────────┘
//! ```

use crate::sys::ProgrammingError;

/// Cristal de referência do PLL (kHz)
pub const PLL_REF_KHZ: u32 = 27_000;

// =============================================================================
// PLL
// =============================================================================

/// Configuração do PLL de pixel clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PllConfig {
    /// Multiplicador (1..=255)
    pub m: u8,
    /// Divisor (1..=255)
    pub n: u8,
    /// Pós-divisor em potência de 2 (0..=3)
    pub p: u8,
}

impl PllConfig {
    pub const fn new(m: u8, n: u8, p: u8) -> Self {
        Self { m, n, p }
    }

    /// Valor a ser escrito em PIXEL_PLL_CTRL
    pub const fn selector(&self) -> u32 {
        (self.m as u32) | ((self.n as u32) << 8) | (((self.p & 0x3) as u32) << 16)
    }

    /// Decodifica o seletor lido do hardware
    pub const fn from_selector(raw: u32) -> Self {
        Self {
            m: (raw & 0xFF) as u8,
            n: ((raw >> 8) & 0xFF) as u8,
            p: ((raw >> 16) & 0x3) as u8,
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.m != 0 && self.n != 0 && self.p <= 3
    }

    /// Frequência de saída (kHz). Zero se a configuração for inválida.
    pub const fn output_khz(&self) -> u32 {
        if !self.is_valid() {
            return 0;
        }
        PLL_REF_KHZ * self.m as u32 / ((self.n as u32) << self.p)
    }
}

// =============================================================================
// PROFILES
// =============================================================================

/// Modos suportados.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileName {
    /// Modo VGA de boot da placa
    Legacy,
    /// 1920x1080 linear
    P1080,
}

impl ProfileName {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::P1080 => "p1080",
        }
    }

    pub fn parse(name: &str) -> Result<Self, ProgrammingError> {
        match name {
            "legacy" => Ok(Self::Legacy),
            "p1080" => Ok(Self::P1080),
            _ => Err(ProgrammingError::ProfileNotFound),
        }
    }
}

/// Conjunto completo de valores de timing de um modo. Imutável.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingProfile {
    pub h_total: u32,
    pub h_display: u32,
    pub h_sync_start: u32,
    pub h_sync_end: u32,
    pub v_total: u32,
    pub v_display: u32,
    pub v_sync_start: u32,
    pub v_sync_end: u32,
    /// Bytes por linha na VRAM
    pub line_stride: u32,
    pub pixel_clock: PllConfig,
    pub bits_per_pixel: u32,
}

impl TimingProfile {
    /// Janelas de sync dentro dos totais, totais maiores que a área visível,
    /// stride suficiente para uma linha visível e PLL válido.
    pub const fn is_consistent(&self) -> bool {
        let h_ok = self.h_display > 0
            && self.h_display <= self.h_sync_start
            && self.h_sync_start < self.h_sync_end
            && self.h_sync_end < self.h_total;
        let v_ok = self.v_display > 0
            && self.v_display <= self.v_sync_start
            && self.v_sync_start < self.v_sync_end
            && self.v_sync_end < self.v_total;
        let bpp_ok = self.bits_per_pixel != 0 && self.bits_per_pixel % 8 == 0;
        let stride_ok =
            bpp_ok && (self.line_stride as u64) >= (self.h_display as u64) * (self.bits_per_pixel as u64 / 8);

        h_ok && v_ok && stride_ok && self.pixel_clock.is_valid()
    }

    pub const fn pixel_clock_khz(&self) -> u32 {
        self.pixel_clock.output_khz()
    }

    /// Taxa de atualização em Hz (arredondada para baixo).
    pub const fn refresh_hz(&self) -> u32 {
        let frame = self.h_total as u64 * self.v_total as u64;
        if frame == 0 {
            return 0;
        }
        (self.pixel_clock_khz() as u64 * 1000 / frame) as u32
    }

    /// Bytes de VRAM ocupados pela área visível.
    pub const fn frame_bytes(&self) -> usize {
        self.line_stride as usize * self.v_display as usize
    }
}

/// 640x480 @ 60 Hz, 8 bpp (modo de boot)
pub const LEGACY: TimingProfile = TimingProfile {
    h_total: 800,
    h_display: 640,
    h_sync_start: 656,
    h_sync_end: 752,
    v_total: 525,
    v_display: 480,
    v_sync_start: 490,
    v_sync_end: 492,
    line_stride: 640,
    pixel_clock: PllConfig::new(28, 15, 1), // 25.2 MHz
    bits_per_pixel: 8,
};

/// 1920x1080 @ 60 Hz, 16 bpp
pub const P1080: TimingProfile = TimingProfile {
    h_total: 2200,
    h_display: 1920,
    h_sync_start: 2008,
    h_sync_end: 2052,
    v_total: 1125,
    v_display: 1080,
    v_sync_start: 1084,
    v_sync_end: 1089,
    line_stride: 3840,
    pixel_clock: PllConfig::new(11, 2, 0), // 148.5 MHz
    bits_per_pixel: 16,
};

const _: () = assert!(LEGACY.is_consistent());
const _: () = assert!(P1080.is_consistent());

/// Busca o perfil pelo nome.
pub fn lookup(name: ProfileName) -> Result<&'static TimingProfile, ProgrammingError> {
    match name {
        ProfileName::Legacy => Ok(&LEGACY),
        ProfileName::P1080 => Ok(&P1080),
    }
}

/// Busca o perfil por string ("legacy" / "p1080").
pub fn lookup_str(name: &str) -> Result<&'static TimingProfile, ProgrammingError> {
    lookup(ProfileName::parse(name)?)
}
