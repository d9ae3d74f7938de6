//! Line-oriented interactive shell
//!
//! One command per line, the argument being the rest of the line so paths
//! with spaces need no quoting. Failures are printed and the shell keeps
//! going; only end of input or `quit` stops it.

use std::io::{self, BufRead, Write};
use tracing::debug;
use crate::merge::merge;
use crate::reveal::reveal_directory;
use crate::session::Session;
use crate::settings::SettingsStore;

const HELP: &str = "\
Commands:
  pdf <path>     choose the PDF file
  zip <path>     choose the ZIP file
  out <dir>      choose (and remember) the output directory
  name <name>    base name of the merged file (blank means \"new\")
  merge          write <out>/<name>.pdf, numbering it if the name is taken
  open           show the output directory in the file manager
  clear          forget the chosen PDF and ZIP
  show           print the current choices
  config         print the settings file location
  help           print this text
  quit           leave the shell";

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Pdf(&'a str),
    Zip(&'a str),
    Out(&'a str),
    Name(&'a str),
    Merge,
    Open,
    Clear,
    Show,
    Config,
    Help,
    Quit,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Parse one input line; `None` for a blank line
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        Some(match word.to_ascii_lowercase().as_str() {
            "pdf" => Command::Pdf(arg),
            "zip" => Command::Zip(arg),
            "out" => Command::Out(arg),
            "name" => Command::Name(arg),
            "merge" => Command::Merge,
            "open" => Command::Open,
            "clear" => Command::Clear,
            "show" => Command::Show,
            "config" => Command::Config,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(word),
        })
    }
}

/// The shell: a session plus the store its directory choices go to
pub struct Shell {
    session: Session,
    store: SettingsStore,
}

impl Shell {
    pub fn new(store: SettingsStore) -> Self {
        Self {
            session: Session::start(&store),
            store,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read commands from `input` until it ends or the user quits
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        writeln!(output, "PDF + ZIP merger. Type `help` for commands.")?;
        self.show(&mut output)?;

        for line in input.lines() {
            let line = line?;
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            debug!(?command, "shell command");
            if command == Command::Quit {
                break;
            }
            self.execute(command, &mut output)?;
        }
        Ok(())
    }

    fn execute<W: Write>(&mut self, command: Command<'_>, output: &mut W) -> io::Result<()> {
        match command {
            Command::Pdf(path) => {
                self.session.set_pdf(&[path]);
                self.show(output)?;
            }
            Command::Zip(path) => {
                self.session.set_zip(&[path]);
                self.show(output)?;
            }
            Command::Out(dir) => match self.session.set_output_dir(dir, &self.store) {
                Ok(()) => self.show(output)?,
                Err(e) => writeln!(output, "Error: {e}")?,
            },
            Command::Name(name) => {
                self.session.set_base_name(name);
                self.show(output)?;
            }
            Command::Merge => match merge(&self.session.request()) {
                Ok(path) => writeln!(output, "Merged into: {}", path.display())?,
                Err(e) => writeln!(output, "Error: {e}")?,
            },
            Command::Open => {
                if let Err(e) = reveal_directory(&self.session.output_dir) {
                    writeln!(output, "Error: {e}")?;
                }
            }
            Command::Clear => {
                self.session.clear();
                self.show(output)?;
            }
            Command::Show => self.show(output)?,
            Command::Config => writeln!(output, "Settings file: {}", self.store.path().display())?,
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Unknown(word) => {
                writeln!(output, "Unknown command `{word}`. Type `help` for commands.")?
            }
            Command::Quit => {}
        }
        Ok(())
    }

    fn show<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let s = &self.session;
        writeln!(output, "  PDF file:   {}", s.pdf_path)?;
        writeln!(output, "  ZIP file:   {}", s.zip_path)?;
        writeln!(output, "  Output dir: {}", s.output_dir)?;
        writeln!(output, "  Name:       {}", s.base_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run_script(shell: &mut Shell, script: &str) -> String {
        let mut out = Vec::new();
        shell.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("pdf /a b/c.pdf"), Some(Command::Pdf("/a b/c.pdf")));
        assert_eq!(Command::parse("NAME  report "), Some(Command::Name("report")));
        assert_eq!(Command::parse("name"), Some(Command::Name("")));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
        assert_eq!(Command::parse("frobnicate x"), Some(Command::Unknown("frobnicate")));
    }

    #[test]
    fn test_merge_session() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("a.pdf");
        let zip = dir.path().join("b.zip");
        fs::write(&pdf, b"%PDF").unwrap();
        fs::write(&zip, b"PK").unwrap();

        let mut shell = Shell::new(SettingsStore::at(dir.path().join("s.ini")));
        let script = format!(
            "pdf {}\nzip {}\nname out\nmerge\nmerge\nquit\nmerge\n",
            pdf.display(),
            zip.display()
        );
        let text = run_script(&mut shell, &script);

        assert_eq!(text.matches("Merged into:").count(), 2);
        assert_eq!(fs::read(dir.path().join("out.pdf")).unwrap(), b"%PDFPK");
        assert_eq!(fs::read(dir.path().join("out1.pdf")).unwrap(), b"%PDFPK");
        assert!(!dir.path().join("out2.pdf").exists());
    }

    #[test]
    fn test_errors_do_not_stop_the_shell() {
        let dir = TempDir::new().unwrap();
        let mut shell = Shell::new(SettingsStore::at(dir.path().join("s.ini")));
        let text = run_script(&mut shell, "merge\nbogus\nopen\nshow\n");

        assert!(text.contains("Error: No PDF file selected"));
        assert!(text.contains("Unknown command `bogus`"));
        assert!(text.contains("Error: No output directory selected"));
        assert!(text.trim_end().ends_with("Name:       new"));
    }

    #[test]
    fn test_out_is_remembered() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::at(dir.path().join("s.ini"));
        let mut shell = Shell::new(store.clone());
        run_script(&mut shell, "out /srv/merged\n");

        assert_eq!(store.load(), "/srv/merged");
        assert_eq!(Shell::new(store).session().output_dir, "/srv/merged");
    }

    #[test]
    fn test_clear_and_config() {
        let dir = TempDir::new().unwrap();
        let mut shell = Shell::new(SettingsStore::at(dir.path().join("s.ini")));
        let text = run_script(&mut shell, "pdf /x/a.pdf\nzip /x/b.zip\nclear\nconfig\n");

        assert!(shell.session().pdf_path.is_empty());
        assert!(shell.session().zip_path.is_empty());
        assert_eq!(shell.session().output_dir, "/x");
        assert!(text.contains("Settings file:"));
    }
}
