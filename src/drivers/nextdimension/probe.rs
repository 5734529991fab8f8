//! # Probe
//!
//! Descrição do dispositivo entregue pelo enumerador do NeXTbus e a
//! validação que decide se esta é uma placa que sabemos dirigir.

use super::regs;

/// O que o enumerador sabe sobre a placa antes do attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescription {
    /// Slot físico no NeXTbus
    pub slot: u8,
    /// Base física da janela de registradores
    pub register_base: u64,
    /// Base física da memória da placa
    pub vram_base: u64,
}

impl DeviceDescription {
    pub const fn new(slot: u8, register_base: u64, vram_base: u64) -> Self {
        Self {
            slot,
            register_base,
            vram_base,
        }
    }

    /// Descrição derivada apenas do número do slot.
    pub const fn for_slot(slot: u8) -> Self {
        Self::new(slot, regs::vtc_base(slot), regs::board_base(slot))
    }
}

/// Aceita a descrição se o slot for de expansão e as janelas estiverem
/// nos endereços que o NeXTbus atribui a esse slot.
pub fn probe(desc: &DeviceDescription) -> bool {
    if !regs::is_valid_slot(desc.slot) {
        crate::kwarn!("(ND) Probe: slot invalido=", desc.slot);
        return false;
    }

    let regs_ok = desc.register_base >= regs::slot_base(desc.slot)
        && desc.register_base < regs::slot_end(desc.slot);
    let vram_ok = desc.vram_base >= regs::board_base(desc.slot)
        && desc.vram_base < regs::board_end(desc.slot);

    if !(regs_ok && vram_ok) {
        crate::kwarn!("(ND) Probe: janelas fora do slot=", desc.slot);
        return false;
    }

    crate::kdebug!("(ND) Probe OK, slot=", desc.slot);
    true
}
