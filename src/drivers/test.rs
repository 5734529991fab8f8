//! Testes de Drivers
//!
//! Roda as suites in-kernel de cada driver do crate.

/// Executa todos os testes de drivers. Retorna true se nenhum falhou.
pub fn run_driver_tests() -> bool {
    crate::kinfo!("╔════════════════════════════════════════╗");
    crate::kinfo!("║     🧪 TESTES DE DRIVERS               ║");
    crate::kinfo!("╚════════════════════════════════════════╝");

    let ok = super::nextdimension::test::run_nextdimension_tests();

    if ok {
        crate::kinfo!("╔════════════════════════════════════════╗");
        crate::kinfo!("║  ✅ DRIVERS VALIDADOS!                 ║");
        crate::kinfo!("╚════════════════════════════════════════╝");
    } else {
        crate::kerror!("(Driver) Suite de drivers com falhas");
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_suites_pass() {
        assert!(run_driver_tests());
    }
}
