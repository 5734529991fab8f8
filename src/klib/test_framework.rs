//! Framework de testes in-kernel (feature `self_test`)

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestResult {
    Passed,
    Failed,
    Skipped,
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Executa suite de testes. Retorna (passed, failed, skipped).
pub fn run_test_suite(name: &str, tests: &[TestCase]) -> (usize, usize, usize) {
    crate::kinfo!("=== Executando suite:");
    crate::kinfo!(name);
    #[cfg(not(any(feature = "log_trace", feature = "log_debug", feature = "log_info")))]
    let _ = name;

    let mut passed = 0;
    let mut failed = 0;
    let mut skipped = 0;

    for test in tests {
        match (test.func)() {
            TestResult::Passed => {
                crate::kok!(test.name);
                passed += 1;
            }
            TestResult::Failed => {
                crate::kerror!(test.name);
                failed += 1;
            }
            TestResult::Skipped => {
                crate::kwarn!(test.name);
                skipped += 1;
            }
        }
    }

    crate::kinfo!("Resultados: passed=", passed as u64);
    if failed > 0 {
        crate::kerror!("Resultados: failed=", failed as u64);
    }
    (passed, failed, skipped)
}
