//! Geometria de display visível ao chamador.

use super::timing::TimingProfile;
use super::window::FrameMemoryWindow;

/// Descrição do modo ativo (o `IODisplayInfo` do display service).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    pub width: u32,
    pub height: u32,
    /// Pixels por linha incluindo blanking
    pub total_width: u32,
    pub row_bytes: u32,
    pub refresh_hz: u32,
    pub bits_per_pixel: u32,
    /// Endereço virtual do buffer visível
    pub frame_buffer: usize,
    /// Endereço físico do buffer visível
    pub frame_buffer_phys: u64,
}

impl DisplayGeometry {
    pub fn from_profile(profile: &TimingProfile, vram: &FrameMemoryWindow) -> Self {
        Self {
            width: profile.h_display,
            height: profile.v_display,
            total_width: profile.h_total,
            row_bytes: profile.line_stride,
            refresh_hz: profile.refresh_hz(),
            bits_per_pixel: profile.bits_per_pixel,
            frame_buffer: vram.virt_base(),
            frame_buffer_phys: vram.phys_base(),
        }
    }

    /// Bytes do buffer visível.
    pub fn size_bytes(&self) -> usize {
        self.row_bytes as usize * self.height as usize
    }
}
