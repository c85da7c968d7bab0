//! Lifecycle controller
//!
//! The controller is the only path that mutates an entity's status. Every
//! operation resolves its target, checks preconditions, runs the backend hook
//! through an [`OperationContext`] and only then persists the result.
//!
//! Transitions on the same application id are serialized through
//! [`TransitionLocks`], and status updates go through the store's conditional
//! update so a concurrent writer in another process surfaces as
//! `StatusConflict` instead of a lost update.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::{
    InstallOperation, Operation, OperationContext, OperationKind, OperationOutcome,
    TransitionLocks, dependency,
};
use crate::catalog::{Application, ApplicationProvider, Catalog};
use crate::config::{Config, resolver};
use crate::domain::{ApplicationDescriptor, ApplicationEntity, ApplicationRef, Status};
use crate::error::{AppError, Result, lifecycle as lifecycle_error, store as store_error};
use crate::store::{EntityStore, MetadataStore, SiteStore, StatusUpdate};

pub struct LifecycleController {
    config: Config,
    sites: Arc<dyn SiteStore>,
    entities: Arc<dyn EntityStore>,
    catalog: Arc<dyn Catalog>,
    metadata: Arc<dyn MetadataStore>,
    locks: TransitionLocks,
}

impl LifecycleController {
    pub fn new(
        config: Config,
        sites: Arc<dyn SiteStore>,
        entities: Arc<dyn EntityStore>,
        catalog: Arc<dyn Catalog>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            config,
            sites,
            entities,
            catalog,
            metadata,
            locks: TransitionLocks::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sites(&self) -> &Arc<dyn SiteStore> {
        &self.sites
    }

    pub fn entities(&self) -> &Arc<dyn EntityStore> {
        &self.entities
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    pub fn metadata(&self) -> &Arc<dyn MetadataStore> {
        &self.metadata
    }

    /// Run any operation
    pub fn execute(&self, operation: Operation) -> Result<OperationOutcome> {
        match operation {
            Operation::Install(request) => self.install(request).map(OperationOutcome::Entity),
            Operation::Uninstall(reference) => {
                self.uninstall(&reference).map(OperationOutcome::Entity)
            }
            Operation::Start(reference) => self.start(&reference).map(OperationOutcome::Entity),
            Operation::Stop(reference) => self.stop(&reference).map(OperationOutcome::Entity),
            Operation::CheckStatus(reference) => {
                self.status(&reference).map(OperationOutcome::Status)
            }
        }
    }

    /// Install an application type on a site
    ///
    /// The entity is persisted only after dependency validation and the
    /// install hook have both succeeded.
    pub fn install(&self, request: InstallOperation) -> Result<ApplicationEntity> {
        if request.site_id.trim().is_empty() {
            return Err(lifecycle_error::invalid_argument("siteId is required"));
        }
        if request.app_type.trim().is_empty() {
            return Err(lifecycle_error::invalid_argument("appType is required"));
        }

        info!(site_id = %request.site_id, app_type = %request.app_type, "installing application");

        let site = self
            .sites
            .find_by_site_id(&request.site_id)?
            .ok_or_else(|| lifecycle_error::site_not_found(&request.site_id))?;

        let descriptor = self
            .catalog
            .descriptor_for_type(&request.app_type)
            .ok_or_else(|| lifecycle_error::descriptor_not_found(&request.app_type))?;
        let provider = self.catalog.provider_for_type(&request.app_type)?;

        let mut entity = ApplicationEntity::new(&site, descriptor, request.mode);
        if let Some(jar_path) = request.jar_path {
            entity.jar_path = Some(jar_path);
        }
        entity.configuration =
            resolver::resolve(&descriptor.configuration, request.configuration.as_ref());

        let _guard = self.locks.acquire(&entity.app_id);
        self.ensure_not_installed(&entity)?;

        dependency::validate(&entity, descriptor, self.entities.as_ref())?;

        let application = provider.application();
        self.run_hook(OperationKind::Install, &entity, || {
            self.context(application.as_ref(), &entity, descriptor)
                .on_install()
        })?;

        // TODO: compensate the install hook (uninstall on the backend) when this create fails
        let created = self.entities.create(entity)?;
        info!(app_id = %created.app_id, uuid = %created.uuid, "installed application");
        Ok(created)
    }

    /// Uninstall an application, returning the deleted snapshot
    pub fn uninstall(&self, reference: &ApplicationRef) -> Result<ApplicationEntity> {
        let entity = self.entities.find_by_ref(reference)?;
        let _guard = self.locks.acquire(&entity.app_id);
        let entity = self.reload(&entity)?;

        ensure_permitted(&entity, OperationKind::Uninstall)?;

        let provider = self.catalog.provider_for_type(&entity.app_type)?;
        let application = provider.application();
        self.run_hook(OperationKind::Uninstall, &entity, || {
            self.context(application.as_ref(), &entity, provider.descriptor())
                .on_uninstall()
        })?;

        let deleted = self.entities.delete(&entity)?;
        info!(app_id = %deleted.app_id, "uninstalled application");
        Ok(deleted)
    }

    /// Start an application; the status becomes `STARTING` once the backend accepted it
    pub fn start(&self, reference: &ApplicationRef) -> Result<ApplicationEntity> {
        self.transition(reference, OperationKind::Start, Status::Starting)
    }

    /// Stop an application; the status becomes `STOPPING` once the backend accepted it
    pub fn stop(&self, reference: &ApplicationRef) -> Result<ApplicationEntity> {
        self.transition(reference, OperationKind::Stop, Status::Stopping)
    }

    /// Status reported by the backend
    ///
    /// This may be ahead of the persisted status; nothing is reconciled here.
    /// See [`LifecycleController::refresh`].
    pub fn status(&self, reference: &ApplicationRef) -> Result<Status> {
        let entity = self.entities.find_by_ref(reference)?;
        let provider = self.executable_provider(&entity)?;
        let application = provider.application();

        let context = self.context(application.as_ref(), &entity, provider.descriptor());
        context.status().inspect_err(|e| {
            error!(app_id = %entity.app_id, error = %e, "backend status query failed");
        })
    }

    /// Persist the backend-reported status of one application
    ///
    /// Unlike [`LifecycleController::status`], this writes the observed status
    /// back through the conditional update when it differs.
    pub fn refresh(&self, reference: &ApplicationRef) -> Result<ApplicationEntity> {
        let entity = self.entities.find_by_ref(reference)?;
        let provider = self.executable_provider(&entity)?;
        let application = provider.application();

        let _guard = self.locks.acquire(&entity.app_id);
        let entity = self.reload(&entity)?;

        let observed = self
            .context(application.as_ref(), &entity, provider.descriptor())
            .status()?;
        if observed == entity.status {
            return Ok(entity);
        }

        match self
            .entities
            .compare_and_set_status(entity.uuid, entity.status, observed)?
        {
            StatusUpdate::Applied(updated) => {
                info!(app_id = %updated.app_id, from = %entity.status, to = %observed, "synchronized status");
                Ok(updated)
            }
            StatusUpdate::Conflict { actual } => Err(lifecycle_error::illegal_status(
                entity.app_id,
                actual,
                OperationKind::CheckStatus,
            )),
        }
    }

    /// Refresh every executable application
    ///
    /// Applications whose backend cannot be queried are logged and skipped.
    pub fn refresh_all(&self) -> Result<Vec<ApplicationEntity>> {
        let mut refreshed = Vec::new();
        for entity in self.entities.list()? {
            match self.refresh(&ApplicationRef::by_uuid(entity.uuid)) {
                Ok(updated) => refreshed.push(updated),
                Err(AppError::NotExecutable { .. }) => {}
                Err(e) => warn!(app_id = %entity.app_id, error = %e, "failed to refresh status"),
            }
        }
        Ok(refreshed)
    }

    fn transition(
        &self,
        reference: &ApplicationRef,
        operation: OperationKind,
        next: Status,
    ) -> Result<ApplicationEntity> {
        let entity = self.entities.find_by_ref(reference)?;
        let provider = self.executable_provider(&entity)?;
        let application = provider.application();

        let _guard = self.locks.acquire(&entity.app_id);
        let entity = self.reload(&entity)?;

        ensure_permitted(&entity, operation)?;

        info!(app_id = %entity.app_id, site_id = %entity.site_id, "{operation} application");

        let context = self.context(application.as_ref(), &entity, provider.descriptor());
        self.run_hook(operation, &entity, || match operation {
            OperationKind::Stop => context.on_stop(),
            _ => context.on_start(),
        })?;

        // TODO: decide whether a failed status update should undo the hook on the backend
        match self
            .entities
            .compare_and_set_status(entity.uuid, entity.status, next)?
        {
            StatusUpdate::Applied(updated) => {
                info!(app_id = %updated.app_id, status = %updated.status, "{operation} accepted");
                Ok(updated)
            }
            StatusUpdate::Conflict { actual } => {
                warn!(app_id = %entity.app_id, expected = %entity.status, actual = %actual, "status changed concurrently");
                Err(lifecycle_error::status_conflict(
                    entity.app_id,
                    entity.status,
                    actual,
                    operation,
                ))
            }
        }
    }

    /// Reject an install whose (site, type) or app id is already taken
    ///
    /// Distinct (type, site) pairs can share a default app id, e.g. `A_B` on
    /// `c` and `A` on `b_c`.
    fn ensure_not_installed(&self, entity: &ApplicationEntity) -> Result<()> {
        if self
            .entities
            .find_by_site_and_type(&entity.site_id, &entity.app_type)?
            .is_some()
        {
            return Err(store_error::already_installed(&entity.app_id));
        }

        match self
            .entities
            .find_by_ref(&ApplicationRef::by_app_id(&entity.app_id))
        {
            Ok(existing) => {
                warn!(app_id = %entity.app_id, site_id = %existing.site_id, app_type = %existing.app_type, "app id already taken");
                Err(store_error::already_installed(&entity.app_id))
            }
            Err(AppError::ApplicationNotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn executable_provider(
        &self,
        entity: &ApplicationEntity,
    ) -> Result<Arc<dyn ApplicationProvider>> {
        let provider = self.catalog.provider_for_type(&entity.app_type)?;
        if !provider.application().is_executable() {
            return Err(lifecycle_error::not_executable(&entity.app_type));
        }
        Ok(provider)
    }

    /// Read the entity again once its transition lock is held
    fn reload(&self, entity: &ApplicationEntity) -> Result<ApplicationEntity> {
        self.entities
            .find_by_ref(&ApplicationRef::by_uuid(entity.uuid))
    }

    fn context<'a>(
        &'a self,
        application: &'a dyn Application,
        entity: &'a ApplicationEntity,
        descriptor: &'a ApplicationDescriptor,
    ) -> OperationContext<'a> {
        OperationContext::new(
            application,
            entity,
            descriptor,
            &self.config,
            self.metadata.as_ref(),
        )
    }

    fn run_hook(
        &self,
        operation: OperationKind,
        entity: &ApplicationEntity,
        hook: impl FnOnce() -> Result<()>,
    ) -> Result<()> {
        hook().inspect_err(|e| {
            error!(app_id = %entity.app_id, operation = %operation, error = %e, "backend hook failed");
        })
    }
}

fn ensure_permitted(entity: &ApplicationEntity, operation: OperationKind) -> Result<()> {
    if operation.permitted_from().contains(&entity.status) {
        Ok(())
    } else {
        Err(lifecycle_error::illegal_status(
            &entity.app_id,
            entity.status,
            operation,
        ))
    }
}
