// =============================================================================
// LOG SINK BRIDGE - ZERO OVERHEAD
// =============================================================================
//
// Ponte entre os macros k*! e a saída de log do kernel hospedeiro.
//
// ARQUITETURA:
// O driver NÃO possui UART própria. O kernel instala um `LogSink` (tipicamente
// a COM1 dele) uma única vez no carregamento do driver. Sem sink instalado,
// a saída é descartada.
//
// - SEM core::fmt - hex renderizado à mão em buffer na pilha
// - SEM alocação
//
// FUNÇÕES DISPONÍVEIS:
// - emit_str(s)      : Envia string literal
// - emit_hex(v)      : Envia u64 em hexadecimal (0x + 16 dígitos)
// - emit_nl()        : Envia newline (\r\n)
//
// =============================================================================

use spin::RwLock;

/// Destino dos logs do driver (fornecido pelo kernel).
pub trait LogSink: Sync {
    /// Escreve uma string crua. Não deve chamar os macros k*! (reentrância).
    fn write_str(&self, s: &str);
}

static SINK: RwLock<Option<&'static dyn LogSink>> = RwLock::new(None);

/// Instala o sink de log. Substitui o anterior, se houver.
pub fn install_sink(sink: &'static dyn LogSink) {
    *SINK.write() = Some(sink);
}

/// Remove o sink instalado (logs voltam a ser descartados).
pub fn remove_sink() {
    *SINK.write() = None;
}

// =============================================================================
// FUNÇÕES DE ESCRITA - CORE
// =============================================================================

/// Envia uma string para o sink.
#[inline(never)]
pub fn emit_str(s: &str) {
    if let Some(sink) = *SINK.read() {
        sink.write_str(s);
    }
}

/// Envia uma nova linha (CRLF).
#[inline(never)]
pub fn emit_nl() {
    emit_str("\r\n");
}

// =============================================================================
// FUNÇÕES DE ESCRITA - FORMATAÇÃO NUMÉRICA
// =============================================================================

/// Tamanho fixo da saída hex: "0x" + 16 nibbles.
pub const HEX_LEN: usize = 18;

/// Renderiza `value` como 0x0123456789ABCDEF (sempre 18 caracteres).
pub fn render_hex(value: u64, out: &mut [u8; HEX_LEN]) -> &str {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

    out[0] = b'0';
    out[1] = b'x';
    let mut shift = 60u32;
    for slot in out[2..].iter_mut() {
        *slot = DIGITS[((value >> shift) & 0xF) as usize];
        shift = shift.wrapping_sub(4);
    }

    // SAFETY: apenas dígitos ASCII foram escritos
    unsafe { core::str::from_utf8_unchecked(&out[..]) }
}

/// Envia um valor u64 em formato hexadecimal.
#[inline(never)]
pub fn emit_hex(value: u64) {
    let mut buf = [0u8; HEX_LEN];
    emit_str(render_hex(value, &mut buf));
}
