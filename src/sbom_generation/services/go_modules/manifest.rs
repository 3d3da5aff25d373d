//! `go.mod` tokenizer
//!
//! Every line is classified into a named [`Directive`] category instead of
//! being pattern-matched in isolation, so a requirement is recognised by the
//! block it sits in rather than by its shape. The ignore marker is honoured
//! only on genuine requirements and only as the terminal comment token.

use crate::sbom_generation::domain::{Ecosystem, PackageUrl, VersionDelimiter};
use crate::shared::error::SbomError;
use std::path::{Path, PathBuf};

/// Comment token that excludes a requirement from the SBOM
pub const IGNORE_MARKER: &str = "exhortignore";

/// go.mod directive keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Module,
    Go,
    Toolchain,
    Godebug,
    Require,
    Exclude,
    Replace,
    Retract,
    Tool,
    Ignore,
    Use,
}

impl Directive {
    fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "module" => Directive::Module,
            "go" => Directive::Go,
            "toolchain" => Directive::Toolchain,
            "godebug" => Directive::Godebug,
            "require" => Directive::Require,
            "exclude" => Directive::Exclude,
            "replace" => Directive::Replace,
            "retract" => Directive::Retract,
            "tool" => Directive::Tool,
            "ignore" => Directive::Ignore,
            "use" => Directive::Use,
            _ => return None,
        })
    }
}

/// Classification of a single manifest line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or comment-only line
    Blank,
    /// `keyword body` on one line
    Statement { directive: Directive, body: &'a str },
    /// `keyword (`
    BlockOpen(Directive),
    /// `)` closing the current block
    BlockClose,
    /// A line inside a `keyword ( ... )` block
    BlockEntry { directive: Directive, body: &'a str },
    /// Anything the tokenizer has no category for
    Unknown,
}

/// A `require` entry of the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoRequirement {
    pub name: String,
    pub version: String,
    pub indirect: bool,
    pub ignored: bool,
    pub line: usize,
}

impl GoRequirement {
    pub fn purl(&self) -> Result<PackageUrl, SbomError> {
        PackageUrl::from_coordinate(
            Ecosystem::Golang,
            &format!("{}@{}", self.name, self.version),
            VersionDelimiter::At,
        )
    }
}

/// Parsed view of a go.mod file
#[derive(Debug, Clone, Default)]
pub struct GoModManifest {
    module: Option<String>,
    requirements: Vec<GoRequirement>,
}

impl GoModManifest {
    /// Parses manifest text; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, SbomError> {
        let mut manifest = GoModManifest::default();
        let mut block: Option<(Directive, usize)> = None;

        for (idx, raw_line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let (code, comment) = split_comment(raw_line);

            match classify(code, block.map(|(d, _)| d)) {
                LineKind::Blank | LineKind::Unknown => {}
                LineKind::BlockOpen(directive) => block = Some((directive, line_no)),
                LineKind::BlockClose => {
                    if block.take().is_none() {
                        return Err(parse_error(path, line_no, "unexpected ')' outside of a block"));
                    }
                }
                LineKind::Statement { directive, body } => match directive {
                    Directive::Module => manifest.module = Some(unquote(body).to_string()),
                    Directive::Require => {
                        let requirement = parse_requirement(body, comment, line_no, path)?;
                        manifest.requirements.push(requirement);
                    }
                    _ => {}
                },
                LineKind::BlockEntry { directive, body } => {
                    if directive == Directive::Require {
                        let requirement = parse_requirement(body, comment, line_no, path)?;
                        manifest.requirements.push(requirement);
                    }
                }
            }
        }

        if let Some((directive, line)) = block {
            return Err(parse_error(
                path,
                line,
                &format!("unterminated {:?} block", directive).to_lowercase(),
            ));
        }

        Ok(manifest)
    }

    /// Module path declared by the `module` directive
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Every requirement, flat and block-grouped, in file order
    pub fn requirements(&self) -> &[GoRequirement] {
        &self.requirements
    }

    /// Requirements carrying the ignore marker
    pub fn ignored(&self) -> impl Iterator<Item = &GoRequirement> {
        self.requirements.iter().filter(|r| r.ignored)
    }

    /// Version of `name` declared in the manifest, if it is required
    pub fn declared_version(&self, name: &str) -> Option<&str> {
        self.requirements
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.version.as_str())
    }

    /// Canonical purls of all ignored requirements
    pub fn ignored_purls(&self) -> Result<Vec<PackageUrl>, SbomError> {
        self.ignored().map(GoRequirement::purl).collect()
    }
}

/// Classifies the code part of a line given the currently open block
pub fn classify(code: &str, open_block: Option<Directive>) -> LineKind<'_> {
    let code = code.trim();
    if code.is_empty() {
        return LineKind::Blank;
    }

    if let Some(directive) = open_block {
        return if code == ")" {
            LineKind::BlockClose
        } else {
            LineKind::BlockEntry {
                directive,
                body: code,
            }
        };
    }

    if code == ")" {
        return LineKind::BlockClose;
    }

    let keyword_end = code
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(code.len());
    let Some(directive) = Directive::from_keyword(&code[..keyword_end]) else {
        return LineKind::Unknown;
    };

    let body = code[keyword_end..].trim();
    match body.strip_prefix('(') {
        // `require ()` opens and closes an empty block
        Some(rest) if rest.trim() == ")" => LineKind::Blank,
        Some(_) => LineKind::BlockOpen(directive),
        None => LineKind::Statement { directive, body },
    }
}

/// Splits a line into its code and comment parts at the first `//`
fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.find("//") {
        Some(idx) => (&line[..idx], Some(&line[idx + 2..])),
        None => (line, None),
    }
}

/// Tokens of a comment, treating nested `//` as separators
fn comment_tokens(comment: &str) -> Vec<&str> {
    comment
        .split(|c: char| c.is_whitespace() || c == '/')
        .filter(|token| !token.is_empty())
        .collect()
}

fn parse_requirement(
    body: &str,
    comment: Option<&str>,
    line: usize,
    path: &Path,
) -> Result<GoRequirement, SbomError> {
    let mut tokens = body.split_whitespace();
    let name = tokens
        .next()
        .map(unquote)
        .ok_or_else(|| parse_error(path, line, "empty requirement"))?;
    let version = tokens.next().ok_or_else(|| {
        parse_error(path, line, &format!("requirement {} has no version", name))
    })?;
    if !looks_like_version(version) {
        return Err(parse_error(
            path,
            line,
            &format!("requirement {} has an invalid version {}", name, version),
        ));
    }

    let tokens = comment.map(comment_tokens).unwrap_or_default();
    Ok(GoRequirement {
        name: name.to_string(),
        version: version.to_string(),
        indirect: tokens.first() == Some(&"indirect"),
        ignored: tokens.last() == Some(&IGNORE_MARKER),
        line,
    })
}

fn looks_like_version(version: &str) -> bool {
    let mut chars = version.chars();
    matches!(chars.next(), Some('v') | Some('V')) && chars.next().is_some_and(|c| c.is_ascii_digit())
}

fn unquote(token: &str) -> &str {
    token.trim().trim_matches('"')
}

fn parse_error(path: &Path, line: usize, details: &str) -> SbomError {
    SbomError::ManifestParse {
        path: PathBuf::from(path),
        line,
        details: details.to_string(),
    }
}
