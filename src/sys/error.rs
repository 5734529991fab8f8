//! # Error Taxonomy
//!
//! Erros estruturados do driver e o mapeamento para `Errno`.
//!
//! ## Política de Propagação
//! - Nenhum erro é engolido internamente: todos sobem tipados ao chamador.
//! - `PllNotLocked` é o único erro recuperável visível ao usuário
//!   (o chamador pode repetir a transição ou reportar "display not ready").
//! - `InvalidStateTransition` nunca tem efeito colateral no hardware.
//! - `ProfileNotFound` é erro de programação para os perfis embutidos.

use crate::drivers::nextdimension::DisplayMode;

/// Códigos POSIX devolvidos pela camada de syscall do kernel.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    EIO = 5,     // I/O error
    ENXIO = 6,   // No such device or address
    EBUSY = 16,  // Device or resource busy
    ENODEV = 19, // No such device
    EINVAL = 22, // Invalid argument
}

impl Errno {
    pub fn as_isize(self) -> isize {
        -(self as i32) as isize
    }
}

// =============================================================================
// PROGRAMMING ERRORS
// =============================================================================

/// Erros de programação do VTC e de transição de modo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgrammingError {
    /// Perfil de timing não suportado
    ProfileNotFound,
    /// O PLL não travou dentro do orçamento de polling
    PllNotLocked {
        /// Leituras de status efetuadas
        polls: u32,
    },
    /// Transição pedida a partir do estado errado (ou com outra em curso)
    InvalidStateTransition {
        /// Estado observado no momento do pedido
        from: DisplayMode,
    },
    /// Offset fora da janela de registradores (detectado antes de escrever)
    RegisterOutOfBounds {
        offset: usize,
    },
}

impl ProgrammingError {
    /// Retorna descrição legível do erro
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProfileNotFound => "Perfil de timing não suportado",
            Self::PllNotLocked { .. } => "PLL não travou: sinal instável ou ausente",
            Self::InvalidStateTransition { .. } => "Transição de modo inválida",
            Self::RegisterOutOfBounds { .. } => "Registrador fora da janela mapeada",
        }
    }

    /// Indica se o chamador pode tentar a transição de novo
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::PllNotLocked { .. })
    }

    pub fn to_errno(&self) -> Errno {
        match self {
            Self::ProfileNotFound => Errno::EINVAL,
            Self::PllNotLocked { .. } => Errno::EIO,
            Self::InvalidStateTransition { .. } => Errno::EBUSY,
            Self::RegisterOutOfBounds { .. } => Errno::ENXIO,
        }
    }
}

// =============================================================================
// ATTACH ERRORS
// =============================================================================

/// Erros de attach/probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachError {
    /// Slot fora de 1..=14
    InvalidSlot,
    /// Janelas não estão nos endereços que o NeXTbus atribui ao slot
    WindowMismatch,
    /// Janela de registradores não cobre o mapa do VTC
    RegisterWindowTooSmall,
    /// Janela de registradores mapeada com cache (tem que ser CacheOff)
    RegisterWindowCached,
    /// Janelas de registradores e de VRAM se sobrepõem
    WindowsOverlap,
    /// VRAM não comporta um quadro 1080p
    FrameMemoryTooSmall,
}

impl AttachError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidSlot => "Slot NeXTbus inválido",
            Self::WindowMismatch => "Janelas fora do espaço do slot",
            Self::RegisterWindowTooSmall => "Janela de registradores pequena demais",
            Self::RegisterWindowCached => "Janela de registradores precisa ser CacheOff",
            Self::WindowsOverlap => "Janelas de registradores e VRAM sobrepostas",
            Self::FrameMemoryTooSmall => "VRAM menor que um quadro 1080p",
        }
    }

    pub fn to_errno(&self) -> Errno {
        match self {
            Self::InvalidSlot | Self::WindowMismatch => Errno::ENODEV,
            _ => Errno::EINVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pll_failure_is_recoverable() {
        assert!(ProgrammingError::PllNotLocked { polls: 3 }.is_recoverable());
        assert!(!ProgrammingError::ProfileNotFound.is_recoverable());
        assert!(!ProgrammingError::InvalidStateTransition {
            from: DisplayMode::Linear1080p
        }
        .is_recoverable());
    }

    #[test]
    fn test_errno_mapping() {
        assert_eq!(
            ProgrammingError::PllNotLocked { polls: 1 }.to_errno().as_isize(),
            -5
        );
        assert_eq!(AttachError::InvalidSlot.to_errno(), Errno::ENODEV);
        assert_eq!(AttachError::WindowsOverlap.to_errno(), Errno::EINVAL);
    }
}
