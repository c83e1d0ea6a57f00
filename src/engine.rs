//! The seam to the external transformation engine. The compiler produces a
//! stylesheet; an engine executes it against one input document at a time.
//! `SubprocessEngine` drives an external `xsltproc` process; embedded engine
//! bindings implement [`TransformEngine`] directly and can delegate their
//! sort directives to [`crate::sort::sort_node_set`].

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use crate::error::EngineError;

/// Parse-time options forwarded to the engine. An engine applies what it
/// supports.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputOptions {
    pub no_blanks: bool,
    pub allow_net: bool,
}

pub trait TransformEngine {
    /// Executes `stylesheet` against the document at `input` (`-` = stdin)
    /// and returns the transformed output. `params` are stylesheet-level
    /// parameters; values are XPath expressions, already quoted.
    fn transform(
        &mut self,
        stylesheet: &str,
        input: &str,
        params: &[(String, String)],
        options: &InputOptions,
    ) -> Result<String, EngineError>;
}

/// Runs each transformation in an external `xsltproc` process, handing the
/// stylesheet over through a temporary file.
#[derive(Debug)]
pub struct SubprocessEngine {
    command: PathBuf,
}

impl SubprocessEngine {
    pub fn new() -> Self {
        Self { command: PathBuf::from("xsltproc") }
    }

    pub fn with_command(command: impl Into<PathBuf>) -> Self {
        Self { command: command.into() }
    }
}

impl Default for SubprocessEngine {
    fn default() -> Self {
        Self::new()
    }
}

// xsltproc reports a document parse failure with status 6.
const STATUS_DOCUMENT_PARSE: i32 = 6;

impl TransformEngine for SubprocessEngine {
    fn transform(
        &mut self,
        stylesheet: &str,
        input: &str,
        params: &[(String, String)],
        options: &InputOptions,
    ) -> Result<String, EngineError> {
        let mut sheet = tempfile::NamedTempFile::new()?;
        sheet.write_all(stylesheet.as_bytes())?;
        sheet.flush()?;

        if options.no_blanks {
            log::debug!("subprocess engine has no blank-node stripping; ignoring --noblanks");
        }

        let mut command = Command::new(&self.command);
        if !options.allow_net {
            command.arg("--nonet");
        }
        for (name, value) in params {
            command.args(["--param", name, value]);
        }
        command.arg(sheet.path());
        command.arg(input);

        log::debug!("running {:?}", command);
        let output = command.output()?;
        if !output.stderr.is_empty() {
            let _ = std::io::stderr().write_all(&output.stderr);
        }
        if !output.status.success() {
            let status = output.status.code().unwrap_or(-1);
            return Err(if status == STATUS_DOCUMENT_PARSE {
                EngineError::DocumentParse { status }
            } else {
                EngineError::Failed { status }
            });
        }
        String::from_utf8(output.stdout).map_err(|e| EngineError::Output(e.to_string()))
    }
}
