//! Post-install runtime checks.

use std::path::PathBuf;

use crate::error::{ProvisionError, Result};
use crate::provision::{Advisories, Executor, Step};
use crate::shell::Invocation;

/// Native integer width the target package needs.
pub const REQUIRED_INT_WIDTH: u32 = 64;

const VERSION_SNIPPET: &str = "echo PHP_VERSION;";
const INT_WIDTH_SNIPPET: &str = "echo PHP_INT_SIZE * 8;";

/// The installed runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    /// Resolved interpreter path.
    pub binary: PathBuf,
    /// `PHP_VERSION`, if the query succeeded.
    pub version: Option<String>,
    /// `PHP_INT_SIZE * 8`, if the query succeeded.
    pub int_width: Option<u32>,
}

impl RuntimeInfo {
    /// Invocation evaluating `code` with the runtime.
    pub fn eval(&self, code: &str) -> Invocation {
        Invocation::new(self.binary.display().to_string()).args(["-r", code])
    }
}

/// Resolve the runtime on PATH and query its version and integer width.
///
/// `binaries` are tried in order. Failing to resolve any of them is fatal;
/// query failures and a non-64-bit build are advisories.
pub fn verify_runtime(
    executor: &mut Executor<'_>,
    binaries: &[String],
    advisories: &mut Advisories,
) -> Result<RuntimeInfo> {
    let binary = binaries
        .iter()
        .find_map(|name| executor.system().find_executable(name))
        .ok_or_else(|| ProvisionError::RuntimeUnresolvable {
            tried: binaries.join(", "),
        })?;
    tracing::debug!("PHP resolved to {}", binary.display());

    let mut info = RuntimeInfo {
        binary,
        version: None,
        int_width: None,
    };

    let result = executor.query(info.eval(VERSION_SNIPPET));
    if result.success && !result.stdout_trimmed().is_empty() {
        info.version = Some(result.stdout_trimmed().to_string());
    } else {
        advisories.push(
            Step::RuntimeVerify,
            format!("Could not query the PHP version ({})", result.failure_detail()),
        );
    }

    let result = executor.query(info.eval(INT_WIDTH_SNIPPET));
    match result.stdout_trimmed().parse::<u32>() {
        Ok(width) if result.success => {
            info.int_width = Some(width);
            if width != REQUIRED_INT_WIDTH {
                advisories.push(
                    Step::RuntimeVerify,
                    format!(
                        "PHP integers are {}-bit; {}-bit is required",
                        width, REQUIRED_INT_WIDTH
                    ),
                );
            }
        }
        _ => advisories.push(
            Step::RuntimeVerify,
            "Could not determine the PHP integer width".to_string(),
        ),
    }

    Ok(info)
}
