//! Environment template (`.env.example`)

/// Comment block written when the base layout carries no template
pub const DEFAULT_HEADER: &str = "\
# Copy this file to .env and fill in the values.
# Every variable below is required by at least one selected agent.
";

#[derive(Debug, Clone, PartialEq, Eq)]
struct EnvLine {
    text: String,
    /// Variable declared on this line, if any
    name: Option<String>,
    /// `"\n"`, `"\r\n"`, or empty for an unterminated last line
    ending: String,
}

/// Ordered, deduplicated list of variable names with their surrounding text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvTemplate {
    lines: Vec<EnvLine>,
    /// Line ending used for appended variables, taken from the first terminated line
    newline: &'static str,
}

impl EnvTemplate {
    pub fn parse(content: &str) -> Self {
        let lines: Vec<EnvLine> = content
            .split_inclusive('\n')
            .map(|chunk| {
                let (text, ending) = match chunk.strip_suffix("\r\n") {
                    Some(text) => (text, "\r\n"),
                    None => match chunk.strip_suffix('\n') {
                        Some(text) => (text, "\n"),
                        None => (chunk, ""),
                    },
                };
                EnvLine {
                    text: text.to_string(),
                    name: Self::var_name(text).map(str::to_string),
                    ending: ending.to_string(),
                }
            })
            .collect();
        let newline = match lines.iter().find(|line| !line.ending.is_empty()) {
            Some(line) if line.ending == "\r\n" => "\r\n",
            _ => "\n",
        };
        Self { lines, newline }
    }

    fn var_name(line: &str) -> Option<&str> {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            return None;
        }
        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        let (name, _) = trimmed.split_once('=')?;
        let name = name.trim();
        (!name.is_empty()).then_some(name)
    }

    /// Declared variable names in file order
    pub fn names(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| line.name.as_deref())
            .collect()
    }

    /// Return a template that also declares `vars`, appended with empty values
    pub fn with_vars(&self, vars: &[String]) -> Self {
        let mut next = self.clone();
        for var in vars {
            if next.names().contains(&var.as_str()) {
                continue;
            }
            if let Some(last) = next.lines.last_mut() {
                if last.ending.is_empty() {
                    last.ending = self.newline.to_string();
                }
            }
            next.lines.push(EnvLine {
                text: format!("{}=\"\"", var),
                name: Some(var.clone()),
                ending: self.newline.to_string(),
            });
        }
        next
    }

    pub fn render(&self) -> String {
        self.lines
            .iter()
            .flat_map(|line| [line.text.as_str(), line.ending.as_str()])
            .collect()
    }
}

impl Default for EnvTemplate {
    fn default() -> Self {
        Self::parse(DEFAULT_HEADER)
    }
}
