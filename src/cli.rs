//! The `select` command surface: global flag parsing, usage text and the
//! per-file run loop. Template tokens are not parsed here; from the first
//! `-t` on, the stream belongs to the compiler.

use std::io::Write;

use crate::assembler::{self, Assembly};
use crate::engine::{InputOptions, TransformEngine};
use crate::error::{EXIT_BAD_ARGS, EXIT_INTERNAL, EXIT_SUCCESS, SelectError, UsageError};
use crate::output;

#[derive(Debug, Default)]
pub struct SelectConfig {
    pub print_program: bool,
    pub quiet: bool,
    pub no_blanks: bool,
    pub text: bool,
    pub root_wrap: bool,
    pub indent: bool,
    pub xml_decl: bool,
    pub encoding: Option<String>,
    pub allow_net: bool,
    pub namespaces: Vec<(String, String)>,
}

#[derive(Debug)]
pub enum Parsed {
    /// Config plus the index of the first template marker.
    Run(SelectConfig, usize),
    Help,
}

/// Walks the global flags, which must precede the first `-t`.
pub fn parse_global_args(args: &[String]) -> Result<Parsed, UsageError> {
    let mut config = SelectConfig::default();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-t" | "--template" => return Ok(Parsed::Run(config, i)),
            "-C" => config.print_program = true,
            "-Q" | "--quiet" => config.quiet = true,
            "-B" | "--noblanks" => config.no_blanks = true,
            "-T" | "--text" => config.text = true,
            "-R" | "--root" => config.root_wrap = true,
            "-I" | "--indent" => config.indent = true,
            "-D" | "--xml-decl" => config.xml_decl = true,
            "-E" | "--encode" => {
                i += 1;
                let name = args
                    .get(i)
                    .ok_or_else(|| UsageError::MissingArgument("--encode".to_string()))?;
                config.encoding = Some(name.clone());
            }
            "-N" => {
                i += 1;
                let binding = args
                    .get(i)
                    .ok_or_else(|| UsageError::MissingArgument("-N".to_string()))?;
                let (prefix, uri) = binding
                    .split_once('=')
                    .ok_or_else(|| UsageError::InvalidNamespaceBinding(binding.clone()))?;
                config.namespaces.push((prefix.to_string(), uri.to_string()));
            }
            "--net" => config.allow_net = true,
            "-h" | "--help" => return Ok(Parsed::Help),
            _ => return Err(UsageError::UnknownOption(arg.to_string())),
        }
        i += 1;
    }
    Err(UsageError::NoTemplates)
}

/// Runs the compiled program over every input file, continuing past per-file
/// failures; the worst per-file exit code wins. Output already written stays
/// written.
pub fn execute<E, W>(
    config: &SelectConfig,
    assembly: &Assembly,
    files: &[String],
    engine: &mut E,
    out: &mut W,
) -> i32
where
    E: TransformEngine + ?Sized,
    W: Write,
{
    let stylesheet = match output::to_xml(&assembly.tree, assembly.root, false) {
        Ok(xml) => xml,
        Err(e) => {
            eprintln!("{e}");
            return e.exit_code();
        }
    };
    let options = InputOptions {
        no_blanks: config.no_blanks,
        allow_net: config.allow_net,
    };

    let stdin_only = [String::from("-")];
    let files = if files.is_empty() { &stdin_only[..] } else { files };

    let mut worst = EXIT_SUCCESS;
    for file in files {
        if file != "-" {
            if let Err(source) = std::fs::metadata(file) {
                let err = SelectError::File { path: file.clone(), source };
                eprintln!("{err}");
                worst = worst.max(err.exit_code());
                continue;
            }
        }
        let mut params = Vec::new();
        if assembly.needs_input_param {
            params.push(("inputFile".to_string(), xpath_string_literal(file)));
        }
        match engine.transform(&stylesheet, file, &params, &options) {
            Ok(result) => {
                if !config.quiet && out.write_all(result.as_bytes()).is_err() {
                    return EXIT_INTERNAL;
                }
            }
            Err(e) => {
                let code = e.exit_code();
                eprintln!("{file}: {e}");
                worst = worst.max(code);
            }
        }
    }
    worst
}

/// Entry point for `xmlsel select <args>`.
pub fn run<E: TransformEngine + ?Sized>(args: &[String], engine: &mut E) -> i32 {
    let (config, first_template) = match parse_global_args(args) {
        Ok(Parsed::Help) => {
            print!("{SELECT_USAGE}");
            return EXIT_SUCCESS;
        }
        Ok(Parsed::Run(config, index)) => (config, index),
        Err(e) => return usage_error(&e),
    };

    let tokens = &args[first_template..];
    let assembly = match assembler::assemble(&config, tokens) {
        Ok(assembly) => assembly,
        Err(e) => return usage_error(&e),
    };
    let files = &tokens[assembly.files_start..];

    if config.print_program {
        return match output::to_xml(&assembly.tree, assembly.root, true) {
            Ok(xml) => {
                println!("{xml}");
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("{e}");
                e.exit_code()
            }
        };
    }

    let mut stdout = std::io::stdout().lock();
    execute(&config, &assembly, files, engine, &mut stdout)
}

fn usage_error(e: &UsageError) -> i32 {
    eprintln!("{e}");
    eprintln!();
    eprint!("{SELECT_USAGE}");
    EXIT_BAD_ARGS
}

/// Quotes a string as an XPath string literal.
pub fn xpath_string_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{value}'")
    } else if !value.contains('"') {
        format!("\"{value}\"")
    } else {
        let parts: Vec<String> = value.split('\'').map(|p| format!("'{p}'")).collect();
        format!("concat({})", parts.join(",\"'\","))
    }
}

pub const MAIN_USAGE: &str = "\
Usage: xmlsel <command> [<options>]
Commands:
  select (sel)   select XML nodes and shape the output
  --version      print version
  -h, --help     print this help
";

pub const SELECT_USAGE: &str = "\
Usage: xmlsel select <global-options> {-t template} [ <xml-file> ... ]
Global options:
  -C                 print the generated XSLT program instead of running it
  -Q, --quiet        do not write anything to standard output
  -B, --noblanks     remove insignificant spaces from the input
  -T, --text         output as text (no element wrapping)
  -R, --root         wrap the output in a root element
  -I, --indent       indent the output
  -D, --xml-decl     do not omit the xml declaration line
  -E, --encode name  output in the given encoding
  -N prefix=uri      predefine a namespace
  --net              allow network fetches
  -h, --help         print this help
Template options (repeatable after each -t):
  -t, --template         start a new template
  -c, --copy-of xpath    print a copy of the selection
  -v, --value-of xpath   print the value of the selection
  -o, --output text      output literal text
  -n, --nl               print a new line
  -f, --inp-name         print the input file name
  -m, --match xpath      iterate over the selection
  -s, --sort ord:typ:cas xpath
                         sort the preceding match (A/D, N/T, U/L)
  -i, --if xpath         conditional branch
      --elif xpath       alternative conditional branch
      --else             fallback branch
  -e, --elem name        write an element
  -a, --attr name        write an attribute
  -b, --break            break out of the current nesting
      --var name[=xpath] declare a variable
";
