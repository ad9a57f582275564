//! Lab reservation: provision a machine for the caller, then record the
//! session and hand back connection details.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use nicelab_core::error::AppError;
use nicelab_core::result::AppResult;
use nicelab_database::{LabStore, SessionStore};
use nicelab_entity::{Lab, LabSession, SessionCredentials};
use nicelab_provision::{Provisioner, username_from_email};

use crate::context::RequestContext;

/// A recorded session together with the credentials to reach it.
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    #[serde(flatten)]
    pub session: LabSession,
    pub credentials: SessionCredentials,
}

/// Orchestrates lab reservations and session lookups.
#[derive(Debug, Clone)]
pub struct ReservationService {
    labs: Arc<dyn LabStore>,
    sessions: Arc<dyn SessionStore>,
    provisioner: Provisioner,
    record_soft_failures: bool,
}

impl ReservationService {
    pub fn new(
        labs: Arc<dyn LabStore>,
        sessions: Arc<dyn SessionStore>,
        provisioner: Provisioner,
        record_soft_failures: bool,
    ) -> Self {
        Self {
            labs,
            sessions,
            provisioner,
            record_soft_failures,
        }
    }

    /// List every lab.
    pub async fn list_labs(&self, _ctx: &RequestContext) -> AppResult<Vec<Lab>> {
        self.labs.list().await
    }

    /// Reserve `lab_id` for the caller.
    ///
    /// 1. Look up the lab (404 if unknown, 409 if unavailable)
    /// 2. Provision it within the configured deadline
    /// 3. Record the session, unless the script exited non-zero and
    ///    soft failures are not recorded
    /// 4. Return the session with its credentials
    pub async fn reserve(&self, ctx: &RequestContext, lab_id: i64) -> AppResult<Reservation> {
        let lab = self
            .labs
            .find_by_id(lab_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Lab {lab_id} not found")))?;

        if !lab.available {
            return Err(AppError::conflict(format!(
                "Lab {lab_id} is not accepting reservations"
            )));
        }

        let outcome = self
            .provisioner
            .provision(&ctx.user, &lab, self.provisioner.default_deadline())
            .await?;

        if !outcome.succeeded {
            warn!(
                user_id = ctx.user_id(),
                lab_id,
                response_code = outcome.response_code,
                recorded = self.record_soft_failures,
                "Provisioning script exited non-zero"
            );
            if !self.record_soft_failures {
                return Err(AppError::provisioning_failed(format!(
                    "Provisioning script on lab {lab_id} exited with code {}",
                    outcome.response_code
                )));
            }
        }

        let session = self.sessions.create(ctx.user_id(), lab.id).await?;
        info!(
            user_id = ctx.user_id(),
            lab_id,
            session_id = session.id,
            "Lab session created"
        );

        let credentials = self.credentials_for(&session);
        Ok(Reservation {
            session,
            credentials,
        })
    }

    /// List every session, newest first. Professors only.
    pub async fn list_sessions(&self, ctx: &RequestContext) -> AppResult<Vec<LabSession>> {
        ctx.require_professor()?;
        self.sessions.list().await
    }

    /// Connection details for a session the caller owns (or any session,
    /// for professors). Trusts the registry; the remote account is not
    /// re-checked.
    pub async fn session_credentials(
        &self,
        ctx: &RequestContext,
        session_id: i64,
    ) -> AppResult<SessionCredentials> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))?;

        if !ctx.can_access(&session) {
            return Err(AppError::authorization(
                "Session belongs to another user",
            ));
        }

        Ok(self.credentials_for(&session))
    }

    fn credentials_for(&self, session: &LabSession) -> SessionCredentials {
        SessionCredentials {
            hostname: session.lab.hostname.clone(),
            username: username_from_email(&session.user.email),
            password: self.provisioner.temporary_password().to_string(),
        }
    }
}
