//! # VTC Programmer
//!
//! Único componente que escreve na `RegisterWindow`.
//!
//! ## Sequência
//!
//! ```text
//! 1. Valida TODOS os offsets contra a janela (nada é escrito se algum falhar)
//! 2. PIXEL_PLL_CTRL        (PLL começa a re-travar enquanto o resto é escrito)
//! 3. H_TOTAL, H_DISPLAY, H_SYNC_START, H_SYNC_END
//! 4. V_TOTAL, V_DISPLAY, V_SYNC_START, V_SYNC_END
//! 5. LINE_STRIDE
//! 6. DISPLAY_CTRL |= MODE_UPDATE          <- sempre a última escrita
//! 7. Polling de PIXEL_PLL_STATUS.LOCK (busy-wait limitado)
//! ```
//!
//! O commit só agenda o latch para o próximo vertical blank; o driver NÃO o
//! trata como conclusão. Só o LOCK do PLL conclui a programação.

use super::regs::{self, DisplayCtrl, PllStatus};
use super::timing::{PllConfig, TimingProfile};
use super::window::{RegisterAccess, RegisterWindow};
use crate::core::config::PollPolicy;
use crate::sys::ProgrammingError;

/// Número de escritas de timing (sem o commit).
pub const TIMING_WRITES: usize = 10;

/// Escritas de timing na ordem em que são emitidas.
pub fn write_plan(profile: &TimingProfile) -> [(usize, u32); TIMING_WRITES] {
    [
        (regs::PIXEL_PLL_CTRL, profile.pixel_clock.selector()),
        (regs::H_TOTAL, profile.h_total),
        (regs::H_DISPLAY, profile.h_display),
        (regs::H_SYNC_START, profile.h_sync_start),
        (regs::H_SYNC_END, profile.h_sync_end),
        (regs::V_TOTAL, profile.v_total),
        (regs::V_DISPLAY, profile.v_display),
        (regs::V_SYNC_START, profile.v_sync_start),
        (regs::V_SYNC_END, profile.v_sync_end),
        (regs::LINE_STRIDE, profile.line_stride),
    ]
}

/// Programa `profile` no VTC e espera o PLL travar.
///
/// Assume acesso exclusivo à janela durante a chamada. Não há cancelamento:
/// uma vez iniciadas as escritas, roda até `Ok` ou `PllNotLocked`.
pub fn program<A: RegisterAccess>(
    profile: &TimingProfile,
    window: &mut RegisterWindow<A>,
    policy: &PollPolicy,
) -> Result<(), ProgrammingError> {
    let plan = write_plan(profile);

    // Um commit com timing pela metade é pior que não tocar no hardware
    for &(offset, _) in plan.iter() {
        window.check(offset)?;
    }
    window.check(regs::DISPLAY_CTRL)?;
    window.check(regs::PIXEL_PLL_STATUS)?;

    crate::kdebug!("(VTC) Escrevendo timing, H_DISPLAY=", profile.h_display);
    for &(offset, value) in plan.iter() {
        crate::ktrace!("(VTC) reg=", offset);
        crate::ktrace!("(VTC)   val=", value);
        window.write(offset, value)?;
    }

    commit(window)?;
    wait_for_lock(window, policy)
}

/// Seta MODE_UPDATE preservando os demais bits de DISPLAY_CTRL.
fn commit<A: RegisterAccess>(window: &mut RegisterWindow<A>) -> Result<(), ProgrammingError> {
    let ctrl = DisplayCtrl::from_bits_retain(window.read(regs::DISPLAY_CTRL)?);
    let ctrl = ctrl | DisplayCtrl::MODE_UPDATE;
    crate::ktrace!("(VTC) Commit DISPLAY_CTRL=", ctrl.bits());
    window.write(regs::DISPLAY_CTRL, ctrl.bits())
}

/// Polling limitado do bit LOCK, com espera fixa entre leituras.
fn wait_for_lock<A: RegisterAccess>(
    window: &mut RegisterWindow<A>,
    policy: &PollPolicy,
) -> Result<(), ProgrammingError> {
    for poll in 1..=policy.max_polls {
        let status = PllStatus::from_bits_retain(window.read(regs::PIXEL_PLL_STATUS)?);
        if status.contains(PllStatus::LOCK) {
            crate::kdebug!("(VTC) PLL travado apos polls=", poll);
            return Ok(());
        }
        if poll < policy.max_polls {
            policy.delay();
        }
    }

    crate::kerror!("(VTC) PLL nao travou, polls=", policy.max_polls);
    Err(ProgrammingError::PllNotLocked {
        polls: policy.max_polls,
    })
}

/// Lê o timing atualmente programado no hardware.
///
/// Usado no attach para guardar o modo em que a placa estava (fallback
/// fornecido pelo hardware para o revert). O bpp é inferido do stride.
pub fn capture<A: RegisterAccess>(
    window: &mut RegisterWindow<A>,
) -> Result<TimingProfile, ProgrammingError> {
    let h_display = window.read(regs::H_DISPLAY)?;
    let line_stride = window.read(regs::LINE_STRIDE)?;
    let bits_per_pixel = match h_display {
        0 => 0,
        w if line_stride % w == 0 => (line_stride / w).saturating_mul(8),
        _ => 0,
    };

    Ok(TimingProfile {
        h_total: window.read(regs::H_TOTAL)?,
        h_display,
        h_sync_start: window.read(regs::H_SYNC_START)?,
        h_sync_end: window.read(regs::H_SYNC_END)?,
        v_total: window.read(regs::V_TOTAL)?,
        v_display: window.read(regs::V_DISPLAY)?,
        v_sync_start: window.read(regs::V_SYNC_START)?,
        v_sync_end: window.read(regs::V_SYNC_END)?,
        line_stride,
        pixel_clock: PllConfig::from_selector(window.read(regs::PIXEL_PLL_CTRL)?),
        bits_per_pixel,
    })
}
