use crate::clients::ClientError;
use std::fmt::{Display, Formatter};

/// When a reconcile operation returns an error, it must explicitly state whether or not the remote
/// sharing state was changed before the failure. There is no rollback.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RemoteState {
    /// The error happened before any mutating call succeeded. The remote is as it was.
    Untouched,

    /// At least one mutating call succeeded before the error. The remote is somewhere between the
    /// old and the desired state, and the next reconcile will pick up from there.
    Diverged,

    /// A mutating call failed and it is unknown whether the platform applied it.
    Unknown,
}

/// What went wrong, independently of where.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The desired state is contradictory or not allowed.
    Validation,
    /// A project name could not be turned into an id, or the other way round.
    Resolution,
    /// The shared resource does not exist.
    NotFound,
    /// A call to the platform failed.
    Remote,
}

/// The error type returned by the [`Reconciler`] and the [`SingleReconciler`].
///
/// [`Reconciler`]: crate::Reconciler
/// [`SingleReconciler`]: crate::SingleReconciler
#[derive(Debug)]
pub struct ShareError {
    kind: ErrorKind,

    /// Whether the remote was changed before the error.
    remote_state: RemoteState,

    /// Any message to be included with the error. This will be included in the formatted display
    /// before `inner`.
    context: Option<String>,

    /// The error that caused this error.
    inner: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

/// The result type returned by reconcile operations.
pub type ShareResult<T> = std::result::Result<T, ShareError>;

impl ShareError {
    pub fn new_with_source_and_context<S, E>(
        kind: ErrorKind,
        remote_state: RemoteState,
        context: S,
        source: E,
    ) -> Self
    where
        S: Into<String>,
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            remote_state,
            context: Some(context.into()),
            inner: Some(source.into()),
        }
    }

    pub fn new_with_context<S>(kind: ErrorKind, remote_state: RemoteState, context: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            kind,
            remote_state,
            context: Some(context.into()),
            inner: None,
        }
    }

    /// A validation error never leaves anything behind.
    pub fn validation<S: Into<String>>(context: S) -> Self {
        Self::new_with_context(ErrorKind::Validation, RemoteState::Untouched, context)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn remote_state(&self) -> RemoteState {
        self.remote_state
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn inner(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.inner.as_ref().map(|some| some.as_ref())
    }
}

impl Display for ShareError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(context) = self.context() {
            write!(f, ", {}", context)?;
        }
        if let Some(inner) = self.inner() {
            write!(f, ": {}", inner)?;
        }
        if self.remote_state != RemoteState::Untouched {
            write!(f, " ({})", self.remote_state)?;
        }
        Ok(())
    }
}

impl ErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Invalid sharing request",
            ErrorKind::Resolution => "Unable to resolve project",
            ErrorKind::NotFound => "Shared resource not found",
            ErrorKind::Remote => "Platform call failed",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self.message(), f)
    }
}

impl RemoteState {
    pub fn message(&self) -> &'static str {
        match self {
            RemoteState::Untouched => "sharing was not changed",
            RemoteState::Diverged => "sharing was partially applied",
            RemoteState::Unknown => "sharing may have been partially applied",
        }
    }
}

impl Display for RemoteState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self.message(), f)
    }
}

// Make `ShareError` function as a standard error.
impl std::error::Error for ShareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// A trait that makes it possible to convert client errors to `ShareError` using a familiar
/// `context` function.
pub trait IntoShareError<T> {
    /// Convert `self` into a `ShareError`.
    fn context<S>(self, remote_state: RemoteState, message: S) -> ShareResult<T>
    where
        S: Into<String>;
}

// A platform 404 keeps its meaning, everything else is a failed remote call.
impl<T> IntoShareError<T> for std::result::Result<T, ClientError> {
    fn context<S>(self, remote_state: RemoteState, message: S) -> ShareResult<T>
    where
        S: Into<String>,
    {
        self.map_err(|e| {
            let kind = if e.is_not_found() {
                ErrorKind::NotFound
            } else {
                ErrorKind::Remote
            };
            ShareError::new_with_source_and_context(kind, remote_state, message, e)
        })
    }
}

// Implement `IntoShareError` for options where `None` is converted into an error.
impl<T> IntoShareError<T> for std::option::Option<T> {
    fn context<S>(self, remote_state: RemoteState, message: S) -> ShareResult<T>
    where
        S: Into<String>,
    {
        self.ok_or_else(|| ShareError::new_with_context(ErrorKind::Remote, remote_state, message))
    }
}
