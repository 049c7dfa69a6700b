use std::io::{self, Write};

use anyhow::Error;
use thermo_forge::io::DATA_PATH_ENV;
use thermo_forge::{Error as ForgeError, ReferenceKind};

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    let hints = hints_for(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

fn hints_for(err: &Error) -> Vec<String> {
    let mut collector = HintCollector::default();

    if let Some(forge_err) = err.downcast_ref::<ForgeError>() {
        collector.collect_forge_hints(forge_err);
    } else if let Some(io_err) = err.downcast_ref::<io::Error>() {
        collector.collect_std_io_hints(io_err);
    }

    collector.hints
}

#[derive(Default)]
struct HintCollector {
    hints: Vec<String>,
}

impl HintCollector {
    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn collect_forge_hints(&mut self, err: &ForgeError) {
        match err {
            ForgeError::Structural { location, .. } => {
                self.add(format!("Check the entry at '{}'", location.path()));
                self.add("Element and species declarations take a list of names, 'all', or a list of single-key maps");
            }

            ForgeError::ReferenceNotFound { kind, .. } => self.collect_reference_hints(*kind),

            ForgeError::ModelNotFound { .. } => {
                self.add("Run 'tforge models' to list registered model names and aliases");
                self.add("Use 'tforge models --standard-states' for equation-of-state models");
            }

            ForgeError::Consistency { .. } => {
                self.add("A phase that lists reactions must also name a kinetics model");
            }

            ForgeError::UnsupportedFormat { .. } => {
                self.add("CTI and XML inputs are no longer read");
                self.add("Convert the file to YAML before loading it");
            }

            ForgeError::CircularReference { .. } => {
                self.add("A section redirects back to itself through other files");
                self.add("Point one of the listed sections at concrete data instead of another section");
            }

            ForgeError::Deprecated { .. } => {
                self.add("Deprecation notices are fatal under the current configuration");
                self.add("Set deprecations = \"warn\" in the --config file to continue");
            }

            ForgeError::InvalidPhase { .. } => {
                self.add("Check the model parameters and the 'state' entry of the phase");
            }

            ForgeError::Io { source, .. } => self.collect_std_io_hints(source),

            ForgeError::Yaml { .. } => {
                self.add("The input is not valid YAML");
                self.add("Check indentation and quoting near the reported line");
            }

            ForgeError::Config(_) => {
                self.add("Valid keys: data-dirs, use-env-data-path, deprecations");
            }

            ForgeError::Registration { .. } => {}
        }
    }

    fn collect_reference_hints(&mut self, kind: ReferenceKind) {
        match kind {
            ReferenceKind::Element => {
                self.add("Define the element in the 'elements' section of the file");
                self.add("A plain symbol list falls back to the built-in element table");
            }
            ReferenceKind::Species => {
                self.add("Species names are case-sensitive");
                self.add("Check the section the declaration points at");
            }
            ReferenceKind::Section => {
                self.add("Sections are top-level keys of a document");
                self.add("Use 'file.yaml/section' to read a section of another file");
            }
            ReferenceKind::File => {
                self.add("Relative paths are searched next to the referencing file, then in the current directory");
                self.add(format!(
                    "Add search directories with --data-dir or {}",
                    DATA_PATH_ENV
                ));
            }
            ReferenceKind::Phase => {
                self.add("Run 'tforge check FILE' to list the phases of a file");
                self.add("Omit --phase to use the first phase");
            }
        }
    }

    fn collect_std_io_hints(&mut self, err: &io::Error) {
        match err.kind() {
            io::ErrorKind::NotFound => {
                self.add("The file does not exist");
                self.add("Check the path for typos");
            }
            io::ErrorKind::PermissionDenied => {
                self.add("Permission denied");
                self.add("Check the file's read permissions");
            }
            io::ErrorKind::InvalidData => {
                self.add("The file is not valid UTF-8 text");
            }
            _ => {}
        }
    }
}
