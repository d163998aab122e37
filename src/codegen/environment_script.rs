//! Run scripts that export one environment's variables and start the tests.

use std::fmt::Write;

use crate::codegen::error::CodegenError;
use crate::codegen::generator::GeneratedFile;
use crate::codegen::naming::NamedProject;
use crate::codegen::options::ScriptFlavor;
use crate::codegen::source_meta::EnvId;

fn quote_sh(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn escape_bat(value: &str) -> String {
    value.replace('%', "%%")
}

/// Render `run.<env>.env.sh|bat` invoking `test_command` from the output root
pub fn render_environment_script(
    project: &NamedProject,
    id: EnvId,
    test_command: &str,
) -> Result<GeneratedFile, CodegenError> {
    let env = project.meta().environment(id);
    let info = project.environment(id);
    let mut output = String::new();

    match project.layout().script_flavor {
        ScriptFlavor::Sh => {
            writeln!(output, "#!/bin/sh")?;
            writeln!(output, "# Environment: {}", env.name)?;
            for (key, value) in &env.variables {
                writeln!(output, "export {}={}", key, quote_sh(value))?;
            }
            writeln!(output, "cd \"$(dirname \"$0\")/..\" || exit 1")?;
            writeln!(output, "{} \"$@\"", test_command)?;
        }
        ScriptFlavor::Bat => {
            let mut lines = vec![
                "@echo off".to_string(),
                format!("rem Environment: {}", env.name),
                "setlocal".to_string(),
            ];
            for (key, value) in &env.variables {
                lines.push(format!("set \"{}={}\"", key, escape_bat(value)));
            }
            lines.push("cd /d \"%~dp0..\"".to_string());
            lines.push(format!("{} %*", test_command));
            for line in lines {
                write!(output, "{}\r\n", line)?;
            }
        }
    }

    Ok(GeneratedFile::new(&info.output_file_rel_path, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoting() {
        assert_eq!(quote_sh("it's"), "'it'\\''s'");
        assert_eq!(escape_bat("100%"), "100%%");
    }
}
