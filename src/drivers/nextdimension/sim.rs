//! # Banco de Registradores Simulado
//!
//! Modelo determinístico do VTC usado pelos testes de host e pela suite
//! `self_test`. Sem alocação.
//!
//! ## Modelo do PLL
//!
//! - Escrever PIXEL_PLL_CTRL destrava o PLL (re-lock).
//! - Escrever DISPLAY_CTRL com MODE_UPDATE arma o PLL.
//! - Depois de armado, o LOCK aparece na N-ésima leitura de status
//!   (`AfterReads(N)`), só nos N primeiros commits (`FailAfterCommits(N)`)
//!   ou nunca (`Never`).

use super::programmer;
use super::regs::{self, DisplayCtrl, PllStatus};
use super::timing::TimingProfile;
use super::window::{FrameMemoryWindow, IoCache, RegisterAccess, RegisterWindow};
use crate::core::config::{REGISTER_WINDOW_SIZE, VRAM_SIZE};

/// Palavras de 32 bits na janela simulada
pub const SIM_WORDS: usize = REGISTER_WINDOW_SIZE / regs::REGISTER_WIDTH;

/// Escritas guardadas no journal (as demais só são contadas)
pub const JOURNAL_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockBehavior {
    /// LOCK visível a partir da N-ésima leitura após o commit
    AfterReads(u32),
    /// Trava na primeira leitura para os primeiros N commits, nunca depois
    FailAfterCommits(u32),
    /// PLL nunca trava (cabo/oscilador com defeito)
    Never,
}

pub struct SimRegisters {
    words: [u32; SIM_WORDS],
    lock: LockBehavior,
    armed: bool,
    armed_reads: u32,
    commits: u32,
    status_reads: u32,
    writes: usize,
    journal: [(usize, u32); JOURNAL_LEN],
    journal_len: usize,
}

impl SimRegisters {
    pub const fn new(lock: LockBehavior) -> Self {
        Self {
            words: [0; SIM_WORDS],
            lock,
            armed: false,
            armed_reads: 0,
            commits: 0,
            status_reads: 0,
            writes: 0,
            journal: [(0, 0); JOURNAL_LEN],
            journal_len: 0,
        }
    }

    /// Valor de power-on de um registrador (não conta como escrita).
    pub fn with_register(mut self, offset: usize, value: u32) -> Self {
        self.words[offset / regs::REGISTER_WIDTH] = value;
        self
    }

    /// Hardware que já está rodando `profile` (ex.: modo deixado pela ROM).
    pub fn with_timing(mut self, profile: &TimingProfile) -> Self {
        for (offset, value) in programmer::write_plan(profile) {
            self.words[offset / regs::REGISTER_WIDTH] = value;
        }
        self
    }

    pub fn peek(&self, offset: usize) -> u32 {
        self.words[offset / regs::REGISTER_WIDTH]
    }

    /// Conteúdo completo do banco.
    pub fn registers(&self) -> &[u32; SIM_WORDS] {
        &self.words
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn commits(&self) -> u32 {
        self.commits
    }

    pub fn status_reads(&self) -> u32 {
        self.status_reads
    }

    /// Escritas (offset, valor) na ordem em que chegaram.
    pub fn journal(&self) -> &[(usize, u32)] {
        &self.journal[..self.journal_len]
    }

    fn locked(&self) -> bool {
        match self.lock {
            LockBehavior::AfterReads(n) => self.armed && self.armed_reads >= n,
            LockBehavior::FailAfterCommits(n) => self.armed && self.commits <= n,
            LockBehavior::Never => false,
        }
    }
}

impl RegisterAccess for SimRegisters {
    fn read32(&mut self, offset: usize) -> u32 {
        if offset == regs::PIXEL_PLL_STATUS {
            self.status_reads += 1;
            if self.armed {
                self.armed_reads += 1;
            }
            return if self.locked() { PllStatus::LOCK.bits() } else { 0 };
        }
        self.words[offset / regs::REGISTER_WIDTH]
    }

    fn write32(&mut self, offset: usize, value: u32) {
        self.writes += 1;
        if self.journal_len < JOURNAL_LEN {
            self.journal[self.journal_len] = (offset, value);
            self.journal_len += 1;
        }

        match offset {
            regs::PIXEL_PLL_STATUS => return, // RO
            regs::PIXEL_PLL_CTRL => {
                self.armed = false;
                self.armed_reads = 0;
            }
            regs::DISPLAY_CTRL
                if DisplayCtrl::from_bits_retain(value).contains(DisplayCtrl::MODE_UPDATE) =>
            {
                self.armed = true;
                self.armed_reads = 0;
                self.commits += 1;
            }
            _ => {}
        }
        self.words[offset / regs::REGISTER_WIDTH] = value;
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

/// Janela simulada no slot space de `slot`.
pub fn window(slot: u8, lock: LockBehavior) -> RegisterWindow<SimRegisters> {
    window_with(slot, SimRegisters::new(lock))
}

pub fn window_with(slot: u8, sim: SimRegisters) -> RegisterWindow<SimRegisters> {
    RegisterWindow::new(sim, regs::vtc_base(slot), REGISTER_WINDOW_SIZE, IoCache::CacheOff)
}

/// VRAM do slot (identity map).
pub fn vram(slot: u8) -> FrameMemoryWindow {
    let phys = regs::board_base(slot);
    FrameMemoryWindow::new(phys as usize, phys, VRAM_SIZE, IoCache::WriteThrough)
}
