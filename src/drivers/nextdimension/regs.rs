//! # Register Map do VTC
//!
//! Offsets (relativos à janela de registradores mapeada) e bitmasks do
//! Video Timing Controller. Todos os registradores têm 32 bits.
//!
//! ## Layout
//!
//! | Offset | Registrador        | Acesso | Conteúdo                      |
//! |--------|--------------------|--------|-------------------------------|
//! | 0x40   | PIXEL_PLL_CTRL     | RW     | Seletor do pixel clock (M/N/P)|
//! | 0x44   | PIXEL_PLL_STATUS   | RO     | bit 0 = LOCK                  |
//! | 0x48   | H_TOTAL            | RW     | Pixels por linha (c/ blank)   |
//! | 0x4C   | H_DISPLAY          | RW     | Pixels visíveis               |
//! | 0x50   | V_TOTAL            | RW     | Linhas por quadro (c/ blank)  |
//! | 0x54   | V_DISPLAY          | RW     | Linhas visíveis               |
//! | 0x58   | H_SYNC_START       | RW     | Início do HSYNC               |
//! | 0x5C   | H_SYNC_END         | RW     | Fim do HSYNC                  |
//! | 0x60   | DISPLAY_CTRL       | RW     | bit 31 = MODE_UPDATE (commit) |
//! | 0x64   | V_SYNC_START       | RW     | Início do VSYNC               |
//! | 0x68   | V_SYNC_END         | RW     | Fim do VSYNC                  |
//! | 0x6C   | LINE_STRIDE        | RW     | Bytes por linha na VRAM       |
//!
//! ## Layout do NeXTbus
//!
//! ```text
//! Slot space:  0xF000_0000 | (slot << 24)   16 MiB  (registradores)
//! Board space: slot << 28                   256 MiB (memória da placa)
//! ```

use crate::core::config::{BOARD_SPACE_SIZE, FIRST_EXPANSION_SLOT, LAST_SLOT, SLOT_SPACE_SIZE};
use bitflags::bitflags;

// =============================================================================
// OFFSETS
// =============================================================================

/// Offset do VTC dentro do slot space (VTC na base do slot)
pub const ND_VTC_OFFSET: u64 = 0x0000_0000;

pub const PIXEL_PLL_CTRL: usize = 0x40;
pub const PIXEL_PLL_STATUS: usize = 0x44;
pub const H_TOTAL: usize = 0x48;
pub const H_DISPLAY: usize = 0x4C;
pub const V_TOTAL: usize = 0x50;
pub const V_DISPLAY: usize = 0x54;
pub const H_SYNC_START: usize = 0x58;
pub const H_SYNC_END: usize = 0x5C;
pub const DISPLAY_CTRL: usize = 0x60;
pub const V_SYNC_START: usize = 0x64;
pub const V_SYNC_END: usize = 0x68;
pub const LINE_STRIDE: usize = 0x6C;

/// Largura de todo registrador do VTC (bytes)
pub const REGISTER_WIDTH: usize = 4;

/// Bytes da janela que o driver efetivamente toca
pub const REGISTER_SPAN: usize = LINE_STRIDE + REGISTER_WIDTH;

// =============================================================================
// BITS
// =============================================================================

bitflags! {
    /// PIXEL_PLL_STATUS (somente leitura).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PllStatus: u32 {
        /// Setado pelo hardware, de forma assíncrona, quando o pixel clock estabiliza.
        const LOCK = 0x0000_0001;
    }
}

bitflags! {
    /// DISPLAY_CTRL (leitura/escrita).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DisplayCtrl: u32 {
        /// Commit: trava o conjunto de timing pendente no próximo vertical blank.
        const MODE_UPDATE = 0x8000_0000;
    }
}

// =============================================================================
// DESCRITORES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

/// Descrição de um registrador do VTC.
#[derive(Debug, Clone, Copy)]
pub struct RegisterDesc {
    pub name: &'static str,
    pub offset: usize,
    pub access: Access,
}

const fn rw(name: &'static str, offset: usize) -> RegisterDesc {
    RegisterDesc {
        name,
        offset,
        access: Access::ReadWrite,
    }
}

/// Todos os registradores usados pelo driver.
pub const REGISTERS: &[RegisterDesc] = &[
    rw("PIXEL_PLL_CTRL", PIXEL_PLL_CTRL),
    RegisterDesc {
        name: "PIXEL_PLL_STATUS",
        offset: PIXEL_PLL_STATUS,
        access: Access::ReadOnly,
    },
    rw("H_TOTAL", H_TOTAL),
    rw("H_DISPLAY", H_DISPLAY),
    rw("V_TOTAL", V_TOTAL),
    rw("V_DISPLAY", V_DISPLAY),
    rw("H_SYNC_START", H_SYNC_START),
    rw("H_SYNC_END", H_SYNC_END),
    rw("DISPLAY_CTRL", DISPLAY_CTRL),
    rw("V_SYNC_START", V_SYNC_START),
    rw("V_SYNC_END", V_SYNC_END),
    rw("LINE_STRIDE", LINE_STRIDE),
];

/// Busca o descritor pelo offset.
pub fn describe(offset: usize) -> Option<&'static RegisterDesc> {
    REGISTERS.iter().find(|r| r.offset == offset)
}

// =============================================================================
// ENDEREÇAMENTO DO NEXTBUS
// =============================================================================

/// Slot aceito para uma placa de expansão?
#[inline]
pub const fn is_valid_slot(slot: u8) -> bool {
    slot >= FIRST_EXPANSION_SLOT && slot <= LAST_SLOT
}

/// Base física do slot space (registradores).
#[inline]
pub const fn slot_base(slot: u8) -> u64 {
    0xF000_0000 | ((slot as u64) << 24)
}

/// Base física do board space (memória de vídeo).
#[inline]
pub const fn board_base(slot: u8) -> u64 {
    (slot as u64) << 28
}

/// Base física dos registradores do VTC.
#[inline]
pub const fn vtc_base(slot: u8) -> u64 {
    slot_base(slot) + ND_VTC_OFFSET
}

/// Fim (exclusivo) do slot space.
#[inline]
pub const fn slot_end(slot: u8) -> u64 {
    slot_base(slot) + SLOT_SPACE_SIZE
}

/// Fim (exclusivo) do board space.
#[inline]
pub const fn board_end(slot: u8) -> u64 {
    board_base(slot) + BOARD_SPACE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_are_word_aligned_and_unique() {
        for (i, a) in REGISTERS.iter().enumerate() {
            assert_eq!(a.offset % REGISTER_WIDTH, 0, "{}", a.name);
            assert!(a.offset + REGISTER_WIDTH <= REGISTER_SPAN, "{}", a.name);
            for b in &REGISTERS[i + 1..] {
                assert_ne!(a.offset, b.offset);
            }
        }
    }

    #[test]
    fn test_only_status_is_read_only() {
        assert_eq!(describe(PIXEL_PLL_STATUS).map(|r| r.access), Some(Access::ReadOnly));
        assert_eq!(describe(DISPLAY_CTRL).map(|r| r.access), Some(Access::ReadWrite));
        assert!(describe(0x00).is_none());
    }

    #[test]
    fn test_nextbus_layout() {
        assert_eq!(slot_base(2), 0xF200_0000);
        assert_eq!(board_base(2), 0x2000_0000);
        assert_eq!(slot_end(14), 0xFF00_0000);
        assert_eq!(board_end(4), 0x5000_0000);
        assert_eq!(vtc_base(6), 0xF600_0000);
    }

    #[test]
    fn test_slot_space_and_board_space_are_disjoint() {
        for slot in 1..=14u8 {
            assert!(!crate::klib::ranges_overlap(
                slot_base(slot),
                SLOT_SPACE_SIZE,
                board_base(slot),
                BOARD_SPACE_SIZE
            ));
        }
    }

    #[test]
    fn test_slot_validity() {
        assert!(!is_valid_slot(0));
        assert!(is_valid_slot(2));
        assert!(is_valid_slot(14));
        assert!(!is_valid_slot(15));
    }

    #[test]
    fn test_bit_contracts() {
        assert_eq!(PllStatus::LOCK.bits(), 0x1);
        assert_eq!(DisplayCtrl::MODE_UPDATE.bits(), 0x8000_0000);
        assert!(PllStatus::from_bits_retain(0xFFFF_FFFF).contains(PllStatus::LOCK));
    }
}
