//! # NeXTdimension Display Driver
//!
//! Driver do Video Timing Controller (VTC) da placa NeXTdimension.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Mode Controller              │
//! │   Legacy ⇄ Linear1080p (single-flight)  │
//! ├─────────────────────────────────────────┤
//! │            VTC Programmer               │
//! │   timing → commit → poll PLL LOCK       │
//! ├────────────────────┬────────────────────┤
//! │  Timing Profiles   │   Register Map     │
//! └────────────────────┴────────────────────┘
//!            ↓ RegisterWindow (MMIO, CacheOff)
//! ```
//!
//! O kernel entrega as janelas mapeadas no attach; o driver nunca mapeia
//! memória nem desenha pixels.

pub mod controller;
pub mod geometry;
pub mod probe;
pub mod programmer;
pub mod regs;
pub mod timing;
pub mod window;

#[cfg(any(test, feature = "self_test"))]
pub mod sim;


#[cfg(test)]
mod tests;

pub use controller::{DisplayMode, LegacySource, NextDimension};
pub use geometry::DisplayGeometry;
pub use probe::{probe, DeviceDescription};
pub use timing::{ProfileName, TimingProfile};
pub use window::{FrameMemoryWindow, IoCache, MmioRegisters, RegisterAccess, RegisterWindow};
