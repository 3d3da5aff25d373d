use crate::shared::error::SbomError;
use std::fmt;
use std::str::FromStr;

const PURL_SCHEME: &str = "pkg:";

/// Package ecosystem, rendered as the purl `type` segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    Golang,
    Npm,
    Maven,
}

impl Ecosystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Golang => "golang",
            Ecosystem::Npm => "npm",
            Ecosystem::Maven => "maven",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ecosystem {
    type Err = SbomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "golang" => Ok(Ecosystem::Golang),
            "npm" => Ok(Ecosystem::Npm),
            "maven" => Ok(Ecosystem::Maven),
            other => Err(SbomError::InvalidPurl {
                input: other.to_string(),
                details: "unsupported package type".to_string(),
            }),
        }
    }
}

/// Separator between name and version in a raw coordinate token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionDelimiter {
    /// `name@version`, as printed by module graph queries
    At,
    /// `name version`, as written in manifest declarations
    Whitespace,
}

/// Package URL: `pkg:<type>/<namespace>/<name>@<version>`
///
/// The canonical string form (see [`fmt::Display`]) is the identity of a
/// node in the dependency graph and the key used for ignore-list matching.
/// Two purls that differ only in version are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageUrl {
    ecosystem: Ecosystem,
    namespace: Option<String>,
    name: String,
    version: Option<String>,
}

impl PackageUrl {
    pub fn new(
        ecosystem: Ecosystem,
        namespace: Option<String>,
        name: impl Into<String>,
        version: Option<String>,
    ) -> Result<Self, SbomError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SbomError::InvalidPurl {
                input: name,
                details: "package name cannot be empty".to_string(),
            });
        }
        // Empty segments never survive the canonical form
        let namespace = namespace
            .map(|ns| {
                ns.split('/')
                    .filter(|segment| !segment.is_empty())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .filter(|ns| !ns.is_empty());
        Ok(Self {
            ecosystem,
            namespace,
            name,
            version: version.filter(|v| !v.is_empty()),
        })
    }

    /// Parses a raw coordinate such as `github.com/foo/bar@v1.2.0` or
    /// `github.com/foo/bar v1.2.0`.
    ///
    /// Everything before the final `/` is the namespace. A missing version
    /// yields `None`; callers that need a concrete version for a module
    /// identity use [`PackageUrl::with_default_version`].
    pub fn from_coordinate(
        ecosystem: Ecosystem,
        token: &str,
        delimiter: VersionDelimiter,
    ) -> Result<Self, SbomError> {
        let token = token.trim();
        let (namespace, rest) = match token.rfind('/') {
            Some(idx) => (Some(token[..idx].to_string()), &token[idx + 1..]),
            None => (None, token),
        };

        let (name, version) = match delimiter {
            VersionDelimiter::At => match rest.split_once('@') {
                Some((name, version)) => (name, Some(version.trim().to_string())),
                None => (rest, None),
            },
            VersionDelimiter::Whitespace => {
                let mut parts = rest.split_whitespace();
                let name = parts.next().unwrap_or_default();
                (name, parts.next().map(str::to_string))
            }
        };

        Self::new(ecosystem, namespace, name, version).map_err(|_| SbomError::InvalidPurl {
            input: token.to_string(),
            details: "coordinate has no package name".to_string(),
        })
    }

    /// Substitutes `default` when the purl carries no version
    pub fn with_default_version(mut self, default: &str) -> Self {
        if self.version.is_none() {
            self.version = Some(default.to_string());
        }
        self
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// `namespace/name`, or just `name` when there is no namespace
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}/{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for PackageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/", PURL_SCHEME, self.ecosystem)?;
        if let Some(ns) = &self.namespace {
            for segment in ns.split('/').filter(|s| !s.is_empty()) {
                write!(f, "{}/", urlencoding::encode(segment))?;
            }
        }
        write!(f, "{}", urlencoding::encode(&self.name))?;
        if let Some(version) = &self.version {
            write!(f, "@{}", urlencoding::encode(version))?;
        }
        Ok(())
    }
}

impl FromStr for PackageUrl {
    type Err = SbomError;

    /// Parses the canonical string form produced by `Display`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |details: &str| SbomError::InvalidPurl {
            input: s.to_string(),
            details: details.to_string(),
        };

        let rest = s
            .strip_prefix(PURL_SCHEME)
            .ok_or_else(|| invalid("missing 'pkg:' scheme"))?;
        if rest.contains('?') || rest.contains('#') {
            return Err(invalid("qualifiers and subpaths are not supported"));
        }

        let (purl_type, path) = rest
            .split_once('/')
            .ok_or_else(|| invalid("missing package type"))?;
        let ecosystem: Ecosystem = purl_type.parse()?;

        let (path, version) = match path.rfind('@') {
            Some(idx) if !path[idx..].contains('/') => (&path[..idx], Some(&path[idx + 1..])),
            _ => (path, None),
        };

        let decode = |segment: &str| {
            urlencoding::decode(segment)
                .map(|d| d.into_owned())
                .map_err(|e| invalid(&e.to_string()))
        };

        let mut segments: Vec<String> = path
            .split('/')
            .filter(|seg| !seg.is_empty())
            .map(decode)
            .collect::<Result<_, _>>()?;
        let name = segments.pop().ok_or_else(|| invalid("missing package name"))?;
        let namespace = if segments.is_empty() {
            None
        } else {
            Some(segments.join("/"))
        };
        let version = version.map(decode).transpose()?;

        PackageUrl::new(ecosystem, namespace, name, version)
    }
}
