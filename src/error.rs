//! Error types for editing commands and fixture loading

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::model::{BayId, FaceId, GroupId, LayerId};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A structural edit that was refused. No state is written when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("unknown floor layer '{0}'")]
    UnknownLayer(LayerId),

    #[error("floor layer '{layer}' has no facade on face {face}")]
    UnknownFacade { layer: LayerId, face: FaceId },

    #[error("bay '{0}' does not exist in this facade")]
    UnknownBay(BayId),

    #[error("group '{0}' does not exist in this facade")]
    UnknownGroup(GroupId),

    #[error("bay id '{0}' is already used in this facade")]
    DuplicateBay(BayId),

    #[error("bay '{0}' cannot link to itself")]
    SelfLink(BayId),

    /// Linking would make the chain loop back to the bay being linked
    #[error("linking '{bay}' to '{master}' would create a cycle")]
    LinkCycle { bay: BayId, master: BayId },

    #[error("bay '{bay}' mirrors '{source_bay}' and cannot be edited directly")]
    LinkedBayReadOnly { bay: BayId, source_bay: BayId },

    #[error("a group needs at least 2 distinct bays, got {0}")]
    GroupTooSmall(usize),

    #[error("group members must be contiguous in facade order")]
    GroupNotContiguous,

    #[error("bay '{bay}' already belongs to group '{group}'")]
    GroupOverlap { bay: BayId, group: GroupId },

    #[error("invalid repeat bounds: {reason}")]
    InvalidRepeat { reason: String },

    #[error("face {0} cannot lock to itself")]
    SelfLock(FaceId),

    #[error("locking face {face} to {master} would create a cycle")]
    LockCycle { face: FaceId, master: FaceId },

    #[error("unknown window definition '{0}'")]
    UnknownWindowDefinition(String),

    #[error("invalid width {value}: {reason}")]
    InvalidWidth { value: f64, reason: String },

    /// The edit would raise a face's minimum above its current edge length
    #[error("face {face} of layer '{layer}' is {length:.2} m long but would need {minimum:.2} m")]
    FaceTooNarrow {
        layer: LayerId,
        face: FaceId,
        length: f64,
        minimum: f64,
    },
}

impl EditError {
    /// Create an invalid width error
    pub fn invalid_width(value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidWidth {
            value,
            reason: reason.into(),
        }
    }

    /// Create an invalid repeat error
    pub fn invalid_repeat(reason: impl Into<String>) -> Self {
        Self::InvalidRepeat {
            reason: reason.into(),
        }
    }
}

/// Log a refused edit and hand it back as an `Err`
pub(crate) fn reject<T>(err: EditError) -> Result<T, EditError> {
    tracing::warn!(reason = %err, "edit rejected");
    Err(err)
}

/// Errors raised while loading a building fixture
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read building file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse building TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid building: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    /// Create a semantic validation error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Source span of the error, when the TOML parser reported one
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Toml(err) => err.span(),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let message = match self {
            Self::Toml(err) => err.message().to_string(),
            other => other.to_string(),
        };
        let span = self.span().unwrap_or(0..0);

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}: {}", filename, self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_cycle_display() {
        let err = EditError::LinkCycle {
            bay: BayId::from("a"),
            master: BayId::from("c"),
        };
        assert_eq!(err.to_string(), "linking 'a' to 'c' would create a cycle");
    }

    #[test]
    fn test_face_too_narrow_display() {
        let err = EditError::FaceTooNarrow {
            layer: LayerId::from("ground"),
            face: FaceId::A,
            length: 4.0,
            minimum: 5.0,
        };
        assert_eq!(
            err.to_string(),
            "face A of layer 'ground' is 4.00 m long but would need 5.00 m"
        );
    }

    #[test]
    fn test_read_only_display() {
        let err = EditError::LinkedBayReadOnly {
            bay: BayId::from("b2"),
            source_bay: BayId::from("b1"),
        };
        assert!(err.to_string().contains("mirrors 'b1'"));
    }

    #[test]
    fn test_format_toml_error_mentions_file() {
        let source = "[engine\nabsolute_min_width = 1.0\n";
        let err = ConfigError::from(toml::from_str::<toml::Table>(source).unwrap_err());
        assert!(err.span().is_some());
        let rendered = err.format(source, "broken.toml");
        assert!(rendered.contains("broken.toml"));
    }

    #[test]
    fn test_format_invalid_without_span() {
        let err = ConfigError::invalid("duplicate bay id 'b1'");
        let rendered = err.format("", "building.toml");
        assert!(rendered.contains("duplicate bay id"));
    }
}
