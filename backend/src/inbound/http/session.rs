//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The signed and encrypted session cookie carries the requester identity
//! `{userId, roleId}` written at signup or login. Handlers only deal with
//! [`RequesterContext`] values.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, RequesterContext, RoleId, User, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_ID_KEY: &str = "role_id";

const LOGIN_REQUIRED: &str = "login required";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's identity in the session cookie.
    ///
    /// The session id is renewed so a pre-login cookie cannot be reused.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0.renew();
        self.insert(USER_ID_KEY, user.id().get())?;
        self.insert(ROLE_ID_KEY, user.role_id().get())
    }

    /// Fetch the current requester from the session, if present.
    ///
    /// Values that do not form valid identifiers are treated as absent.
    pub fn requester(&self) -> Result<Option<RequesterContext>, Error> {
        let user = self.read(USER_ID_KEY)?;
        let role = self.read(ROLE_ID_KEY)?;
        let (Some(user), Some(role)) = (user, role) else {
            return Ok(None);
        };
        match (UserId::new(user), RoleId::new(role)) {
            (Ok(user_id), Ok(role_id)) => Ok(Some(RequesterContext::new(user_id, role_id))),
            _ => {
                warn!(user, role, "invalid identity in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated requester or return `401 Unauthorized`.
    pub fn require_requester(&self) -> Result<RequesterContext, Error> {
        self.requester()?
            .ok_or_else(|| Error::unauthorized(LOGIN_REQUIRED))
    }

    /// Drop every value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }

    fn insert(&self, key: &str, value: i32) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn read(&self, key: &str) -> Result<Option<i32>, Error> {
        match self.0.get::<i32>(key) {
            Ok(value) => Ok(value),
            Err(error) => {
                warn!(key, %error, "unreadable session value");
                Ok(None)
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
