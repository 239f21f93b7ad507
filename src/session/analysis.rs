//! Analysis Session
//!
//! Binds one layer stack to the shared catalogs and the access layer.
//! Every mutation is gated by `create_analysis`; reading the stack is not.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use crate::access::{Access, AccessControl, Permission, User};
use crate::catalogs::Catalogs;
use crate::error::Result;
use crate::indices::IndexRequest;
use crate::layers::{Layer, LayerSpec, LayerStack};

/// Permission every layer mutation requires
pub const EDIT_PERMISSION: Permission = Permission::CreateAnalysis;

/// A user-facing analysis workspace
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    catalogs: Arc<Catalogs>,
    access: Arc<AccessControl>,
    stack: LayerStack,
}

impl AnalysisSession {
    /// Start a session with an empty stack
    pub fn new(catalogs: Arc<Catalogs>, access: Arc<AccessControl>) -> Self {
        let stack = catalogs.new_stack();
        let session = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            catalogs,
            access,
            stack,
        };
        info!("Started analysis session {}", session.id);
        session
    }

    pub(crate) fn from_parts(
        id: Uuid,
        created_at: DateTime<Utc>,
        catalogs: Arc<Catalogs>,
        access: Arc<AccessControl>,
        stack: LayerStack,
    ) -> Self {
        Self {
            id,
            created_at,
            catalogs,
            access,
            stack,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn stack(&self) -> &LayerStack {
        &self.stack
    }

    /// Run `f` if `user` may edit; a core failure is still an `Err`
    fn gated<T>(
        &mut self,
        user: Option<&User>,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<Access<T>> {
        match self.access.check(user, EDIT_PERMISSION) {
            Access::Granted(()) => f(self).map(Access::Granted),
            Access::Restricted { permission } => Ok(Access::Restricted { permission }),
        }
    }

    /// Append a layer built from `spec`
    pub fn add_layer(&mut self, user: Option<&User>, spec: LayerSpec) -> Result<Access<Layer>> {
        self.gated(user, |session| session.stack.add_layer(spec))
    }

    /// Append a layer for a predefined index
    pub fn add_index(&mut self, user: Option<&User>, name: &str) -> Result<Access<Layer>> {
        self.gated(user, |session| {
            session
                .catalogs
                .indices
                .instantiate_layer(name, &mut session.stack)
        })
    }

    /// Append a layer for a user-built index
    pub fn build_index(
        &mut self,
        user: Option<&User>,
        request: IndexRequest,
    ) -> Result<Access<Layer>> {
        self.gated(user, |session| {
            let spec = request.into_spec(&session.catalogs.bands)?;
            session.stack.add_layer(spec)
        })
    }

    pub fn toggle_visibility(&mut self, user: Option<&User>, id: u64) -> Result<Access<Layer>> {
        self.gated(user, |session| session.stack.toggle_visibility(id))
    }

    pub fn remove_layer(&mut self, user: Option<&User>, id: u64) -> Result<Access<Layer>> {
        self.gated(user, |session| session.stack.remove_layer(id))
    }

    /// Snapshot of the layers, bottom first
    pub fn list_layers(&self) -> Vec<Layer> {
        self.stack.list_layers()
    }
}
