// (FASE2) src/lib.rs
//! NeXTdimension VTC Driver Library.
//!
//! Driver do Video Timing Controller da placa NeXTdimension (NeXTbus).
//! Tira o VTC do modo legado (VGA) para o framebuffer linear 1920x1080
//! e reverte sob demanda.
//!
//! O kernel hospedeiro fornece as janelas já mapeadas (registradores e
//! memória de vídeo); este crate cuida apenas da programação do VTC e da
//! máquina de estados de modo.

#![cfg_attr(not(test), no_std)]

// --- Infraestrutura (Logging, Configuração) ---
pub mod core;
pub mod klib;
pub mod sys; // Taxonomia de erros e Errno

// --- Drivers ---
pub mod drivers;

// Re-exportar a API pública do driver para acesso fácil pelo kernel
pub use crate::drivers::nextdimension::{
    DeviceDescription, DisplayGeometry, DisplayMode, FrameMemoryWindow, NextDimension,
    ProfileName, RegisterWindow, TimingProfile,
};
pub use crate::sys::{AttachError, ProgrammingError};
