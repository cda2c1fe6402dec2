/// Document ID parsing utilities.
///
/// Content lake document IDs follow conventions:
/// - Published: `{id}`
/// - Draft: `drafts.{id}`
/// - Version: `versions.{releaseId}.{id}`
///
/// The site only ever renders published documents.

const DRAFT_PREFIX: &str = "drafts.";
const VERSION_PREFIX: &str = "versions.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentIdKind<'a> {
    Published(&'a str),
    Draft(&'a str),
    Version { release_id: &'a str, base_id: &'a str },
}

impl<'a> DocumentIdKind<'a> {
    pub fn parse(id: &'a str) -> Self {
        if let Some(base) = id.strip_prefix(DRAFT_PREFIX) {
            DocumentIdKind::Draft(base)
        } else if let Some(rest) = id.strip_prefix(VERSION_PREFIX) {
            match rest.split_once('.') {
                Some((release_id, base_id)) => DocumentIdKind::Version {
                    release_id,
                    base_id,
                },
                // Malformed version ID, treated as published
                None => DocumentIdKind::Published(id),
            }
        } else {
            DocumentIdKind::Published(id)
        }
    }

    /// The published document ID regardless of prefix.
    pub fn base_id(&self) -> &'a str {
        match self {
            DocumentIdKind::Published(id) | DocumentIdKind::Draft(id) => *id,
            DocumentIdKind::Version { base_id, .. } => *base_id,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, DocumentIdKind::Published(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_published_id() {
        let kind = DocumentIdKind::parse("abc123");
        assert_eq!(kind, DocumentIdKind::Published("abc123"));
        assert_eq!(kind.base_id(), "abc123");
        assert!(kind.is_published());
    }

    #[test]
    fn parse_draft_id() {
        let kind = DocumentIdKind::parse("drafts.abc123");
        assert_eq!(kind, DocumentIdKind::Draft("abc123"));
        assert_eq!(kind.base_id(), "abc123");
        assert!(!kind.is_published());
    }

    #[test]
    fn parse_version_id() {
        let kind = DocumentIdKind::parse("versions.release1.abc123");
        assert_eq!(
            kind,
            DocumentIdKind::Version {
                release_id: "release1",
                base_id: "abc123",
            }
        );
        assert_eq!(kind.base_id(), "abc123");
        assert!(!kind.is_published());
    }

    #[test]
    fn malformed_version_is_published() {
        assert!(DocumentIdKind::parse("versions.orphan").is_published());
    }
}
