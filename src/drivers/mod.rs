//! # Driver Layer
//!
//! ## Drivers Implementados
//!
//! | Driver         | Arquivo           | Status |
//! |----------------|-------------------|--------|
//! | Log sink       | `serial.rs`       | Ponte para a saída de log do kernel |
//! | NeXTdimension  | `nextdimension/`  | VTC: legado <-> 1080p linear |
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        Display service (kernel/PID1)        │
//! └─────────────────────────────────────────────┘
//!                      ↓ enter_linear_mode / revert_to_vga_mode
//! ┌─────────────────────────────────────────────┐
//! │  Mode Controller → VTC Programmer           │
//! │        ↓                 ↓                  │
//! │  Timing Profiles    Register Map            │
//! └─────────────────────────────────────────────┘
//!                      ↓ MMIO (janela CacheOff)
//! ┌─────────────────────────────────────────────┐
//! │        NeXTdimension VTC (slot space)       │
//! └─────────────────────────────────────────────┘
//! ```

pub mod nextdimension; // VTC da NeXTdimension
pub mod serial; // Sink de log

#[cfg(feature = "self_test")]
pub mod test;
