//! Testes de cenário do Mode Controller sobre o banco simulado

#![cfg(test)]

use super::controller::{DisplayMode, LegacySource, NextDimension};
use super::probe::DeviceDescription;
use super::programmer::TIMING_WRITES;
use super::regs;
use super::sim::{self, LockBehavior, SimRegisters};
use super::timing::{PllConfig, TimingProfile, LEGACY, P1080};
use super::window::{FrameMemoryWindow, IoCache, RegisterWindow};
use crate::core::config::PollPolicy;
use crate::sys::{AttachError, ProgrammingError};
use std::sync::{Arc, Barrier};
use std::thread;

const SLOT: u8 = 2;
const FAST: PollPolicy = PollPolicy::new(16, 0);

/// 720x400 (modo texto da ROM), para o caminho do timing capturado
const ROM_TEXT: TimingProfile = TimingProfile {
    h_total: 900,
    h_display: 720,
    h_sync_start: 738,
    h_sync_end: 846,
    v_total: 449,
    v_display: 400,
    v_sync_start: 412,
    v_sync_end: 414,
    line_stride: 720,
    pixel_clock: PllConfig::new(21, 20, 0),
    bits_per_pixel: 8,
};

fn attach_sim(sim: SimRegisters) -> NextDimension<SimRegisters> {
    NextDimension::attach(
        DeviceDescription::for_slot(SLOT),
        sim::window_with(SLOT, sim),
        sim::vram(SLOT),
    )
    .unwrap()
    .with_poll_policy(FAST)
}

fn attach(lock: LockBehavior) -> NextDimension<SimRegisters> {
    attach_sim(SimRegisters::new(lock))
}

fn registers_of(dev: NextDimension<SimRegisters>) -> RegisterWindow<SimRegisters> {
    dev.detach().0
}

// =============================================================================
// ENTER
// =============================================================================

#[test]
fn test_enter_linear_mode_reports_1080p_geometry() {
    let dev = attach(LockBehavior::AfterReads(3));
    assert_eq!(dev.current_mode(), DisplayMode::Legacy);
    assert_eq!(dev.display_geometry(), None);

    let geometry = dev.enter_linear_mode().unwrap();
    assert_eq!(dev.current_mode(), DisplayMode::Linear1080p);
    assert_eq!(geometry.width, P1080.h_display);
    assert_eq!(geometry.height, P1080.v_display);
    assert_eq!(geometry.row_bytes, P1080.line_stride);
    assert_eq!(geometry.bits_per_pixel, 16);
    assert_eq!(geometry.refresh_hz, 60);
    assert_eq!(geometry.frame_buffer_phys, regs::board_base(SLOT));
    assert_eq!(dev.display_geometry(), Some(geometry));
    assert_eq!(dev.mode_name(), "p1080");
}

#[test]
fn test_enter_without_lock_stays_legacy() {
    let dev = attach(LockBehavior::Never);
    assert_eq!(
        dev.enter_linear_mode(),
        Err(ProgrammingError::PllNotLocked { polls: 16 })
    );
    assert_eq!(dev.current_mode(), DisplayMode::Legacy);
    assert_eq!(dev.display_geometry(), None);
}

#[test]
fn test_retry_after_pll_failure_reprograms_from_scratch() {
    let dev = attach(LockBehavior::Never);
    assert!(dev.enter_linear_mode().unwrap_err().is_recoverable());
    assert!(matches!(
        dev.enter_linear_mode(),
        Err(ProgrammingError::PllNotLocked { .. })
    ));

    let win = registers_of(dev);
    assert_eq!(win.access().write_count(), 2 * (TIMING_WRITES + 1));
    assert_eq!(win.access().commits(), 2);
}

#[test]
fn test_second_enter_is_rejected_without_writes() {
    let dev = attach(LockBehavior::AfterReads(1));
    dev.enter_linear_mode().unwrap();

    assert_eq!(
        dev.enter_linear_mode(),
        Err(ProgrammingError::InvalidStateTransition {
            from: DisplayMode::Linear1080p
        })
    );
    assert_eq!(dev.current_mode(), DisplayMode::Linear1080p);

    let win = registers_of(dev);
    assert_eq!(win.access().write_count(), TIMING_WRITES + 1);
}

// =============================================================================
// REVERT
// =============================================================================

#[test]
fn test_revert_writes_static_legacy_timing() {
    let dev = attach(LockBehavior::AfterReads(1));
    assert_eq!(dev.legacy_source(), LegacySource::Static);

    dev.enter_linear_mode().unwrap();
    dev.revert_to_vga_mode().unwrap();
    assert_eq!(dev.current_mode(), DisplayMode::Legacy);
    assert_eq!(dev.display_geometry(), None);
    assert_eq!(dev.mode_name(), "legacy");

    let win = registers_of(dev);
    let revert_writes = &win.access().journal()[TIMING_WRITES + 1..];
    assert!(revert_writes.contains(&(regs::H_TOTAL, LEGACY.h_total)));
    assert_eq!(win.access().peek(regs::H_TOTAL), 800);
    assert_eq!(win.access().peek(regs::LINE_STRIDE), LEGACY.line_stride);
}

#[test]
fn test_revert_prefers_timing_found_at_attach() {
    let dev = attach_sim(SimRegisters::new(LockBehavior::AfterReads(1)).with_timing(&ROM_TEXT));
    assert_eq!(dev.legacy_source(), LegacySource::Captured);
    assert_eq!(dev.legacy_profile(), &ROM_TEXT);

    dev.enter_linear_mode().unwrap();
    dev.revert_to_vga_mode().unwrap();

    let win = registers_of(dev);
    assert_eq!(win.access().peek(regs::H_TOTAL), ROM_TEXT.h_total);
    assert_eq!(win.access().peek(regs::V_DISPLAY), ROM_TEXT.v_display);
}

#[test]
fn test_board_left_in_1080p_reverts_to_static_vga() {
    // Recarga do driver com a placa ainda em 1080p
    let dev = attach_sim(SimRegisters::new(LockBehavior::AfterReads(1)).with_timing(&P1080));
    assert_eq!(dev.legacy_source(), LegacySource::Static);
    assert_eq!(dev.legacy_profile(), &LEGACY);

    dev.enter_linear_mode().unwrap();
    dev.revert_to_vga_mode().unwrap();

    let win = registers_of(dev);
    assert_eq!(win.access().peek(regs::H_TOTAL), 800);
    assert_eq!(win.access().peek(regs::H_DISPLAY), LEGACY.h_display);
}

#[test]
fn test_revert_from_legacy_is_rejected_without_writes() {
    let dev = attach(LockBehavior::AfterReads(1));
    assert_eq!(
        dev.revert_to_vga_mode(),
        Err(ProgrammingError::InvalidStateTransition {
            from: DisplayMode::Legacy
        })
    );
    assert_eq!(registers_of(dev).access().write_count(), 0);
}

#[test]
fn test_failed_revert_falls_back_to_legacy() {
    let dev = attach(LockBehavior::FailAfterCommits(1));
    dev.enter_linear_mode().unwrap();

    assert!(matches!(
        dev.revert_to_vga_mode(),
        Err(ProgrammingError::PllNotLocked { .. })
    ));
    assert_eq!(dev.current_mode(), DisplayMode::Legacy);
    assert_eq!(dev.display_geometry(), None);
}

// =============================================================================
// IDEMPOTÊNCIA E CONCORRÊNCIA
// =============================================================================

#[test]
fn test_programming_same_profile_twice_gives_same_registers() {
    let a = attach(LockBehavior::AfterReads(2));
    let b = attach(LockBehavior::AfterReads(7));
    a.enter_linear_mode().unwrap();
    b.enter_linear_mode().unwrap();

    let (wa, wb) = (registers_of(a), registers_of(b));
    assert!(wa.access().registers() == wb.access().registers());
    assert_eq!(wa.access().journal(), wb.access().journal());
}

#[test]
fn test_reprogramming_after_round_trip_is_stable() {
    let dev = attach(LockBehavior::AfterReads(1));
    dev.enter_linear_mode().unwrap();
    dev.revert_to_vga_mode().unwrap();
    dev.enter_linear_mode().unwrap();

    let win = registers_of(dev);
    let journal = win.access().journal();
    let stride = TIMING_WRITES + 1;
    assert_eq!(&journal[..stride], &journal[2 * stride..3 * stride]);
}

#[test]
fn test_concurrent_enter_single_flight() {
    let dev = Arc::new(
        attach(LockBehavior::AfterReads(200)).with_poll_policy(PollPolicy::new(400, 200)),
    );
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let dev = Arc::clone(&dev);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                dev.enter_linear_mode()
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(ProgrammingError::InvalidStateTransition { .. })))
            .count(),
        1
    );

    let dev = Arc::try_unwrap(dev).ok().unwrap();
    assert_eq!(dev.current_mode(), DisplayMode::Linear1080p);
    let win = registers_of(dev);
    assert_eq!(win.access().commits(), 1);
    assert_eq!(win.access().write_count(), TIMING_WRITES + 1);
}

#[test]
fn test_concurrent_revert_single_flight() {
    let dev = Arc::new(
        attach(LockBehavior::AfterReads(2000)).with_poll_policy(PollPolicy::new(4000, 1000)),
    );
    dev.enter_linear_mode().unwrap();
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let dev = Arc::clone(&dev);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                dev.revert_to_vga_mode()
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(ProgrammingError::InvalidStateTransition { .. })))
            .count(),
        1
    );

    let dev = Arc::try_unwrap(dev).ok().unwrap();
    assert_eq!(dev.current_mode(), DisplayMode::Legacy);
    let win = registers_of(dev);
    assert_eq!(win.access().commits(), 2);
    assert_eq!(win.access().write_count(), 2 * (TIMING_WRITES + 1));
}

// =============================================================================
// ATTACH
// =============================================================================

#[test]
fn test_attach_rejects_invalid_slot() {
    let res = NextDimension::attach(
        DeviceDescription::for_slot(0),
        sim::window(0, LockBehavior::Never),
        sim::vram(0),
    );
    assert!(matches!(res, Err(AttachError::InvalidSlot)));
}

#[test]
fn test_attach_rejects_window_of_other_slot() {
    let res = NextDimension::attach(
        DeviceDescription::for_slot(SLOT),
        sim::window(4, LockBehavior::Never),
        sim::vram(SLOT),
    );
    assert!(matches!(res, Err(AttachError::WindowMismatch)));
}

#[test]
fn test_attach_rejects_cached_register_window() {
    let win = RegisterWindow::new(
        SimRegisters::new(LockBehavior::Never),
        regs::vtc_base(SLOT),
        0x1000,
        IoCache::CopyBack,
    );
    let res = NextDimension::attach(DeviceDescription::for_slot(SLOT), win, sim::vram(SLOT));
    assert!(matches!(res, Err(AttachError::RegisterWindowCached)));
}

#[test]
fn test_attach_rejects_short_register_window() {
    let win = RegisterWindow::new(
        SimRegisters::new(LockBehavior::Never),
        regs::vtc_base(SLOT),
        regs::DISPLAY_CTRL,
        IoCache::CacheOff,
    );
    let res = NextDimension::attach(DeviceDescription::for_slot(SLOT), win, sim::vram(SLOT));
    assert!(matches!(res, Err(AttachError::RegisterWindowTooSmall)));
}

#[test]
fn test_attach_rejects_small_vram() {
    let base = regs::board_base(SLOT);
    let vram = FrameMemoryWindow::new(base as usize, base, 2 * 1024 * 1024, IoCache::WriteThrough);
    let res = NextDimension::attach(
        DeviceDescription::for_slot(SLOT),
        sim::window(SLOT, LockBehavior::Never),
        vram,
    );
    assert!(matches!(res, Err(AttachError::FrameMemoryTooSmall)));
}

#[test]
fn test_attach_reads_but_never_writes() {
    let dev = attach(LockBehavior::Never);
    assert_eq!(dev.slot(), SLOT);
    assert_eq!(dev.poll_policy(), FAST);
    assert_eq!(dev.frame_memory().len(), crate::core::config::VRAM_SIZE);

    let (win, vram) = dev.detach();
    assert_eq!(win.access().write_count(), 0);
    assert_eq!(vram, sim::vram(SLOT));
}
