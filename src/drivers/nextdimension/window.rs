//! # Janelas Mapeadas
//!
//! `RegisterWindow`: bloco de registradores MMIO do VTC, com acesso por
//! offset verificado contra o tamanho da janela.
//! `FrameMemoryWindow`: memória de pixels da placa (board space).
//!
//! Ambas são fornecidas pelo kernel já mapeadas e pertencem exclusivamente
//! à instância do driver enquanto o dispositivo estiver anexado.

use super::regs::REGISTER_WIDTH;
use crate::sys::ProgrammingError;
use core::ptr::NonNull;
use volatile::VolatilePtr;

/// Política de cache do mapeamento (espelha o que o kernel usou no map).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoCache {
    CacheOff,
    WriteThrough,
    CopyBack,
}

// =============================================================================
// ACESSO A REGISTRADORES
// =============================================================================

/// Backend de acesso de 32 bits a uma janela de registradores.
///
/// Os offsets recebidos já foram validados por `RegisterWindow`.
pub trait RegisterAccess: Send {
    fn read32(&mut self, offset: usize) -> u32;
    fn write32(&mut self, offset: usize, value: u32);
}

/// Acesso MMIO real via ponteiros voláteis.
pub struct MmioRegisters {
    base: NonNull<u32>,
}

// SAFETY: a janela pertence exclusivamente a uma instância do driver;
// mover entre CPUs não cria aliasing.
unsafe impl Send for MmioRegisters {}

impl MmioRegisters {
    /// # Safety
    ///
    /// `base` deve apontar para uma região mapeada CacheOff, válida durante
    /// toda a vida deste objeto e não acessada por mais ninguém.
    pub const unsafe fn new(base: NonNull<u32>) -> Self {
        Self { base }
    }

    #[inline]
    fn reg(&self, offset: usize) -> VolatilePtr<'_, u32> {
        // SAFETY: offset validado por RegisterWindow (alinhado e dentro da janela)
        unsafe {
            let ptr = self.base.as_ptr().cast::<u8>().add(offset).cast::<u32>();
            VolatilePtr::new(NonNull::new_unchecked(ptr))
        }
    }
}

impl RegisterAccess for MmioRegisters {
    #[inline]
    fn read32(&mut self, offset: usize) -> u32 {
        self.reg(offset).read()
    }

    #[inline]
    fn write32(&mut self, offset: usize, value: u32) {
        self.reg(offset).write(value)
    }
}

// =============================================================================
// REGISTER WINDOW
// =============================================================================

/// Janela de registradores com verificação de limites.
pub struct RegisterWindow<A: RegisterAccess> {
    access: A,
    phys_base: u64,
    len: usize,
    cache: IoCache,
}

impl<A: RegisterAccess> RegisterWindow<A> {
    pub fn new(access: A, phys_base: u64, len: usize, cache: IoCache) -> Self {
        Self {
            access,
            phys_base,
            len,
            cache,
        }
    }

    pub fn phys_base(&self) -> u64 {
        self.phys_base
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cache(&self) -> IoCache {
        self.cache
    }

    /// Offset alinhado a 32 bits e inteiramente dentro de `[0, len)`?
    pub fn check(&self, offset: usize) -> Result<(), ProgrammingError> {
        let in_range = offset
            .checked_add(REGISTER_WIDTH)
            .map_or(false, |end| end <= self.len);
        if offset % REGISTER_WIDTH != 0 || !in_range {
            return Err(ProgrammingError::RegisterOutOfBounds { offset });
        }
        Ok(())
    }

    pub fn read(&mut self, offset: usize) -> Result<u32, ProgrammingError> {
        self.check(offset)?;
        Ok(self.access.read32(offset))
    }

    pub fn write(&mut self, offset: usize, value: u32) -> Result<(), ProgrammingError> {
        self.check(offset)?;
        self.access.write32(offset, value);
        Ok(())
    }

    /// Backend (inspeção em testes).
    pub fn access(&self) -> &A {
        &self.access
    }

    pub fn into_access(self) -> A {
        self.access
    }
}

impl RegisterWindow<MmioRegisters> {
    /// Janela sobre um mapeamento MMIO real.
    ///
    /// # Safety
    ///
    /// `virt_base..virt_base+len` deve estar mapeado CacheOff sobre
    /// `phys_base` e permanecer válido enquanto a janela existir.
    pub unsafe fn mmio(virt_base: NonNull<u32>, phys_base: u64, len: usize) -> Self {
        Self::new(MmioRegisters::new(virt_base), phys_base, len, IoCache::CacheOff)
    }
}

// =============================================================================
// FRAME MEMORY WINDOW
// =============================================================================

/// Memória de pixels mapeada (VRAM da placa). O driver nunca desenha nela;
/// apenas publica o endereço na `DisplayGeometry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMemoryWindow {
    virt_base: usize,
    phys_base: u64,
    len: usize,
    cache: IoCache,
}

impl FrameMemoryWindow {
    pub const fn new(virt_base: usize, phys_base: u64, len: usize, cache: IoCache) -> Self {
        Self {
            virt_base,
            phys_base,
            len,
            cache,
        }
    }

    pub fn virt_base(&self) -> usize {
        self.virt_base
    }

    pub fn phys_base(&self) -> u64 {
        self.phys_base
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cache(&self) -> IoCache {
        self.cache
    }
}
