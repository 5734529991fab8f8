//! Core Module
//!
//! Infraestrutura independente de hardware usada pelo driver:
//! logging zero-overhead e constantes de configuração.

pub mod config;
pub mod logging;
