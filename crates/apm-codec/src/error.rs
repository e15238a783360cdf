/// Errors from codec lookup, encoding, and registry construction.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The value could not be converted to BSON.
    #[error("failed to encode {type_name}: {reason}")]
    Encode { type_name: String, reason: String },

    /// The document could not be converted back into the target type.
    #[error("failed to decode {type_name}: {reason}")]
    Decode { type_name: String, reason: String },

    /// An entity codec was handed a BSON value that is not a document.
    #[error("expected a document for {type_name}, got {found}")]
    NotADocument { type_name: String, found: String },

    /// A polymorphic document is missing its discriminator.
    #[error("document for {type_name} has no discriminator")]
    MissingDiscriminator { type_name: String },

    /// A polymorphic document names a variant the descriptor does not declare.
    #[error("unknown discriminator {tag:?} for {type_name}")]
    UnknownDiscriminator { type_name: String, tag: String },

    /// A monomorphic entity serialized with a discriminator field.
    #[error("{type_name} is registered without a discriminator but encoded one ({tag:?})")]
    UnexpectedDiscriminator { type_name: String, tag: String },

    /// A descriptor was registered against the wrong Rust type.
    #[error("descriptor for {descriptor} registered against {actual}")]
    DescriptorMismatch { descriptor: String, actual: String },

    /// A descriptor is internally inconsistent.
    #[error("invalid descriptor for {type_name}: {reason}")]
    InvalidDescriptor { type_name: String, reason: String },

    /// The same type or kind was registered twice.
    #[error("{0} is already registered")]
    DuplicateRegistration(String),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
