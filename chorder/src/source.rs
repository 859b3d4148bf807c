use crate::error::BoxError;
use regex::Regex;
use std::process::Command;
use std::sync::LazyLock;

static SQL_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*--.*$").expect("comment pattern is valid")
});

/// Produces `explain ast` dump lines for a statement.
///
/// Implementations receive the full explain text (see [`explain_query`]) and
/// must not have side effects; a batch calls them once per statement.
pub trait AstSource {
    fn explain_ast(&mut self, explain_query: &str) -> Result<Vec<String>, BoxError>;
}

impl<F> AstSource for F
where
    F: FnMut(&str) -> Result<Vec<String>, BoxError>,
{
    fn explain_ast(&mut self, explain_query: &str) -> Result<Vec<String>, BoxError> {
        self(explain_query)
    }
}

/// Removes whole-line `--` comments.
pub fn strip_sql_comments(query: &str) -> String {
    SQL_COMMENT_RE.replace_all(query, "").into_owned()
}

pub fn explain_query(query: &str) -> String {
    format!("explain ast {}", strip_sql_comments(query))
}

/// Runs `clickhouse-local` (or a compatible program) once per statement.
/// Output is requested as `TSVRaw` so quotes in literals come back unescaped.
#[derive(Clone, Debug)]
pub struct ClickHouseLocal {
    program: String,
}

impl ClickHouseLocal {
    pub fn new(program: impl Into<String>) -> Self {
        ClickHouseLocal {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for ClickHouseLocal {
    fn default() -> Self {
        ClickHouseLocal::new("clickhouse-local")
    }
}

impl AstSource for ClickHouseLocal {
    fn explain_ast(&mut self, explain_query: &str) -> Result<Vec<String>, BoxError> {
        tracing::debug!(program = %self.program, "requesting ast dump");
        let output = Command::new(&self.program)
            .arg("--output-format")
            .arg("TSVRaw")
            .arg("--query")
            .arg(explain_query)
            .output()
            .map_err(|err| format!("failed to run '{}': {}", self.program, err))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )
            .into());
        }

        let stdout = String::from_utf8(output.stdout)?;
        Ok(stdout.lines().map(str::to_string).collect())
    }
}
