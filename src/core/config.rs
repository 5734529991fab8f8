//! # Configuração do Driver
//!
//! Define constantes e a política de polling do PLL.

// =============================================================================
// LAYOUT DO NEXTBUS
// =============================================================================

/// Primeiro slot válido para placas de expansão (slot 0 = placa da CPU)
pub const FIRST_EXPANSION_SLOT: u8 = 1;

/// Último slot utilizável. O board space do slot 15 (0xF000_0000) coincide
/// com a região de slot space de todos os slots.
pub const LAST_SLOT: u8 = 14;

/// Tamanho do slot space de cada slot (16 MiB)
pub const SLOT_SPACE_SIZE: u64 = 1 << 24;

/// Tamanho do board space de cada slot (256 MiB)
pub const BOARD_SPACE_SIZE: u64 = 1 << 28;

// =============================================================================
// JANELAS MAPEADAS
// =============================================================================

/// Tamanho da janela de registradores mapeada pelo kernel (uma página)
pub const REGISTER_WINDOW_SIZE: usize = 0x1000;

/// Memória de vídeo da NeXTdimension (4 MiB de VRAM)
pub const VRAM_SIZE: usize = 4 * 1024 * 1024;

// =============================================================================
// POLLING DO PLL
// =============================================================================

/// Número máximo de leituras do status do PLL antes de desistir
pub const PLL_POLL_BUDGET: u32 = 1000;

/// Iterações de spin entre duas leituras do status
pub const PLL_POLL_DELAY_SPINS: u32 = 10_000;

/// Política de espera pelo lock do PLL (busy-wait limitado).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Leituras máximas do registrador de status (>= 1)
    pub max_polls: u32,
    /// Spins entre leituras consecutivas
    pub delay_spins: u32,
}

impl PollPolicy {
    pub const DEFAULT: Self = Self {
        max_polls: PLL_POLL_BUDGET,
        delay_spins: PLL_POLL_DELAY_SPINS,
    };

    pub const fn new(max_polls: u32, delay_spins: u32) -> Self {
        // Pelo menos uma leitura, senão o lock nunca seria observado
        let max_polls = if max_polls == 0 { 1 } else { max_polls };
        Self {
            max_polls,
            delay_spins,
        }
    }

    /// Espera fixa entre leituras (sem yield: roda com interrupções controladas).
    #[inline]
    pub fn delay(&self) {
        for _ in 0..self.delay_spins {
            core::hint::spin_loop();
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}
