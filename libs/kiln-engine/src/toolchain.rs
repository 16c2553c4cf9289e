// Maps a language to concrete toolchain invocations.
//
// All paths are relative to the request workspace, which is also the child's
// working directory. No general-purpose shell is involved anywhere:
// user-controlled text only ever travels as file contents or positional
// arguments.

use crate::language::Language;
use crate::workspace::{RequestWorkspace, BINARY_NAME, SOURCE_STEM};

/// One child-process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Launch plan for one request: an optional compile step, then the run step.
/// If the compile step fails, the run step is never attempted.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub compile: Option<CommandSpec>,
    pub run: CommandSpec,
}

/// Pure mapping from language to launch plan.
///
/// The compile-then-run split for C is deliberate: a failing `gcc` surfaces
/// as a compile error with the compiler's diagnostics, and the binary is
/// never executed.
pub fn invocation_for(language: Language, ws: &RequestWorkspace) -> Invocation {
    let source = format!("{}.{}", SOURCE_STEM, language.extension());

    match language {
        Language::Javascript => {
            let mut run = CommandSpec::new("node").arg(&source);
            if ws.node_modules_dir().is_dir() {
                run = run.env("NODE_PATH", ws.node_modules_dir().display().to_string());
            }
            Invocation { compile: None, run }
        }
        Language::Python => {
            let mut run = CommandSpec::new("python3").arg("-u").arg(&source);
            if ws.pydeps_dir().is_dir() {
                run = run.env("PYTHONPATH", ws.pydeps_dir().display().to_string());
            }
            Invocation { compile: None, run }
        }
        Language::C => {
            let compile = CommandSpec::new("gcc")
                .arg(&source)
                .arg("-O2")
                .arg("-o")
                .arg(BINARY_NAME)
                .arg("-lm");
            let run = CommandSpec::new(format!("./{}", BINARY_NAME));
            Invocation {
                compile: Some(compile),
                run,
            }
        }
    }
}
