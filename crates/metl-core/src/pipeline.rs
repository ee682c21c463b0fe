//! Pipeline orchestration
//!
//! One generic [`Pipeline`] sequences the staged run:
//!
//! ```text
//! INIT -> STAGE -> [RETRIEVE] -> TRANSFORM -> [DEPLOY -> POST_DEPLOY] -> DONE
//! ```
//!
//! Task variants are composed from a [`VariantSpec`] plus a strategy
//! value holding the caller's callbacks; there is no subclass chain.
//! The staging area is created first and owned for the whole run, so
//! its drop guard removes the scratch directories on every exit path.

use std::collections::BTreeSet;
use std::fs;

use metl_meta::{ApiName, EntityCatalog, Membership, render_package_manifest};

use crate::client::{DeployOptions, DeployResult, TransferClient};
use crate::config::TaskOptions;
use crate::engine::{EntityTransform, transform_entity_files};
use crate::staging::StagingArea;
use crate::{Error, Result};

/// Which optional stages a task variant executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSpec {
    pub needs_retrieve: bool,
    pub needs_deploy: bool,
}

/// Outcome of a pipeline run.
#[derive(Debug)]
pub enum RunOutcome {
    /// The deploy stage ran and the post-deploy hook (if any) passed.
    Deployed(DeployResult),
    /// The variant declared no deploy stage; content was transformed
    /// and discarded with the staging area.
    Staged,
}

/// Caller-supplied routine writing new content into the deploy root.
pub type SynthesizeFn = Box<dyn FnMut(&std::path::Path) -> Result<()>>;

/// Caller-supplied routine transforming a multi-entity batch from the
/// retrieve root into the deploy root, returning the surviving
/// membership.
pub type BatchTransformFn =
    Box<dyn FnMut(&std::path::Path, &std::path::Path) -> Result<Membership>>;

enum Strategy {
    Synthesis {
        synthesize: SynthesizeFn,
    },
    Batch {
        membership: Membership,
        transform: BatchTransformFn,
    },
    SingleEntity {
        entity_type: String,
        requested: BTreeSet<ApiName>,
        transform: Box<dyn EntityTransform>,
    },
}

/// A configured pipeline, ready to run once.
pub struct Pipeline<'a> {
    client: &'a dyn TransferClient,
    catalog: &'a EntityCatalog,
    options: TaskOptions,
    variant: VariantSpec,
    strategy: Strategy,
    post_deploy: Option<Box<dyn FnMut(&DeployResult) -> Result<()>>>,
}

impl<'a> Pipeline<'a> {
    /// Synthesis variant: no retrieval; `synthesize` creates new
    /// content in the deploy root, and the deploy manifest is built by
    /// scanning what it wrote.
    pub fn synthesis(
        client: &'a dyn TransferClient,
        catalog: &'a EntityCatalog,
        options: TaskOptions,
        synthesize: SynthesizeFn,
    ) -> Self {
        Self {
            client,
            catalog,
            options,
            variant: VariantSpec {
                needs_retrieve: false,
                needs_deploy: true,
            },
            strategy: Strategy::Synthesis { synthesize },
            post_deploy: None,
        }
    }

    /// Batch-transform variant: retrieves the declared membership,
    /// hands both roots to `transform`, and deploys the membership it
    /// returns.
    pub fn transform_batch(
        client: &'a dyn TransferClient,
        catalog: &'a EntityCatalog,
        options: TaskOptions,
        membership: Membership,
        transform: BatchTransformFn,
    ) -> Self {
        Self {
            client,
            catalog,
            options,
            variant: VariantSpec {
                needs_retrieve: true,
                needs_deploy: true,
            },
            strategy: Strategy::Batch {
                membership,
                transform,
            },
            post_deploy: None,
        }
    }

    /// Single-entity variant: one entity type, requested api names
    /// taken from the options (namespace-injected and escaped), with
    /// wildcard and suppression semantics from the transform engine.
    pub fn single_entity(
        client: &'a dyn TransferClient,
        catalog: &'a EntityCatalog,
        options: TaskOptions,
        entity_type: impl Into<String>,
        transform: Box<dyn EntityTransform>,
    ) -> Self {
        let requested = options.requested_names();
        Self {
            client,
            catalog,
            options,
            variant: VariantSpec {
                needs_retrieve: true,
                needs_deploy: true,
            },
            strategy: Strategy::SingleEntity {
                entity_type: entity_type.into(),
                requested,
                transform,
            },
            post_deploy: None,
        }
    }

    /// Override which optional stages run, e.g. to stage a transform
    /// without deploying it.
    pub fn with_variant(mut self, variant: VariantSpec) -> Self {
        self.variant = variant;
        self
    }

    /// Attach a hook invoked with the deploy result after a
    /// successful deploy. A hook failure fails the whole run even
    /// though the deploy already committed.
    pub fn with_post_deploy(
        mut self,
        hook: Box<dyn FnMut(&DeployResult) -> Result<()>>,
    ) -> Self {
        self.post_deploy = Some(hook);
        self
    }

    /// Execute the staged run.
    pub fn run(&mut self) -> Result<RunOutcome> {
        let staging = StagingArea::create()?;

        if self.variant.needs_retrieve {
            tracing::info!("Extracting existing metadata");
            let manifest = self.options.inject(&render_package_manifest(
                &self.retrieve_membership(),
                &self.options.api_version,
            ));
            self.client
                .retrieve(&manifest, &self.options.api_version, staging.retrieve_root())?;
        }

        let surviving = self.run_transform(&staging)?;

        if !self.variant.needs_deploy {
            return Ok(RunOutcome::Staged);
        }

        tracing::info!("Loading transformed metadata");
        let membership = match surviving {
            Some(membership) => membership,
            None => Membership::from_deploy_dir(staging.deploy_root(), self.catalog)?,
        };
        let manifest = self
            .options
            .inject(&render_package_manifest(&membership, &self.options.api_version));
        let manifest_path = staging.deploy_root().join("package.xml");
        fs::write(&manifest_path, manifest).map_err(|e| Error::io(&manifest_path, e))?;

        let deploy_options = DeployOptions {
            managed: self.options.managed,
            namespace_inject: self.options.namespace_inject.clone(),
        };
        let result = self.client.deploy(staging.deploy_root(), &deploy_options)?;

        if let Some(hook) = &mut self.post_deploy
            && let Err(source) = hook(&result)
        {
            return Err(Error::PostDeploy {
                status: result.status,
                source: Box::new(source),
            });
        }

        Ok(RunOutcome::Deployed(result))
    }

    /// The membership the retrieve request declares: the requested
    /// (pre-wildcard-expansion) names.
    fn retrieve_membership(&self) -> Membership {
        let mut membership = Membership::new();
        match &self.strategy {
            Strategy::Synthesis { .. } => {}
            Strategy::Batch { membership: declared, .. } => {
                membership = declared.clone();
            }
            Strategy::SingleEntity {
                entity_type,
                requested,
                ..
            } => {
                membership.insert_all(entity_type, requested.iter().cloned());
            }
        }
        membership
    }

    /// Run the TRANSFORM stage. Returns the surviving membership, or
    /// `None` when the deploy manifest must be built by scanning the
    /// deploy area.
    fn run_transform(&mut self, staging: &StagingArea) -> Result<Option<Membership>> {
        let catalog = self.catalog;
        match &mut self.strategy {
            Strategy::Synthesis { synthesize } => {
                synthesize(staging.deploy_root())?;
                Ok(None)
            }
            Strategy::Batch { transform, .. } => Ok(Some(transform(
                staging.retrieve_root(),
                staging.deploy_root(),
            )?)),
            Strategy::SingleEntity {
                entity_type,
                requested,
                transform,
            } => {
                let surviving = transform_entity_files(
                    catalog,
                    staging.retrieve_root(),
                    staging.deploy_root(),
                    entity_type,
                    requested,
                    transform.as_mut(),
                )?;
                let mut membership = Membership::new();
                membership.insert_all(entity_type, surviving);
                Ok(Some(membership))
            }
        }
    }
}
