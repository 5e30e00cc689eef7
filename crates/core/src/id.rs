// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity id newtypes.

/// Define a newtype id wrapper around a v4 `uuid::Uuid`.
///
/// Generates `new()` for random id generation, `from_uuid()`, `as_uuid()`,
/// `short()` (first 8 hex chars, for log lines), `Display`, and `FromStr`.
///
/// ```ignore
/// define_id! {
///     /// Doc comment for the id type.
///     pub struct StepId;
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            /// Generate a new random id.
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wrap an existing uuid (for parsing/deserialization).
            pub fn from_uuid(id: uuid::Uuid) -> Self {
                Self(id)
            }

            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }

            /// First 8 hex characters of the id, for compact log output.
            pub fn short(&self) -> String {
                let mut s = self.0.simple().to_string();
                s.truncate(8);
                s
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.simple())
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id! {
    /// Unique identifier for a job (one build attempt for a source revision).
    pub struct JobId;
}

define_id! {
    /// Unique identifier for a build (a group of jobs sharing a cause).
    pub struct BuildId;
}

define_id! {
    /// Unique identifier for a phase (named grouping of steps within a job).
    pub struct PhaseId;
}

define_id! {
    /// Unique identifier for a step, the atomic schedulable unit.
    ///
    /// Replacement steps are intentionally minted with a fresh id so that a
    /// second step can exist on the same phase under the same label.
    pub struct StepId;
}

define_id! {
    /// Unique identifier for a command within a step.
    pub struct CommandId;
}

define_id! {
    /// Unique identifier for a build/test target record.
    pub struct TargetId;
}

define_id! {
    /// Unique identifier for a captured snapshot image.
    pub struct ImageId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
