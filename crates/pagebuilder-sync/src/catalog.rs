//! Full catalog reconciliation.
//!
//! Walks the template root and brings the persisted catalog in line with the
//! filesystem: templates and sections are created or restored by key, pages
//! are created once per non-dynamic template directory, associations are
//! upserted with seeded data, and rows whose source disappeared are
//! soft-deleted by the seen-ids/complement pattern. Running the pass twice
//! with no filesystem change produces no writes beyond timestamp touches.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use pagebuilder_core::{AssociationId, Page, Template, TemplateId, slugify};
use pagebuilder_storage::{CatalogStore as _, DynCatalogStore, NewPage, SectionUpsert};

use crate::error::SyncError;
use crate::parser::parse_sections;
use crate::scanner::{Scanner, TemplateDir};

/// Configuration for a full catalog sync.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Root directory containing one subdirectory per template.
    pub root: PathBuf,
    /// Substring marking a directory path as the dynamic namespace.
    pub dynamic_marker: String,
}

impl SyncConfig {
    /// Creates a config with the default dynamic marker (`"dynamic"`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dynamic_marker: "dynamic".to_string(),
        }
    }

    /// Overrides the dynamic-namespace marker.
    #[must_use]
    pub fn with_dynamic_marker(mut self, marker: impl Into<String>) -> Self {
        self.dynamic_marker = marker.into();
        self
    }
}

/// Statistics and skipped templates from one full sync run.
#[derive(Debug, Default, Clone)]
pub struct SyncReport {
    /// Templates brought back from the trash.
    pub templates_restored: usize,
    /// Templates created or refreshed via update-or-create.
    pub templates_synced: usize,
    /// Templates soft-deleted because their directory disappeared.
    pub templates_pruned: u64,
    /// Pages created for newly discovered template directories.
    pub pages_created: usize,
    /// Section definitions brought back from the trash.
    pub sections_restored: usize,
    /// Section definitions created or refreshed via update-or-create.
    pub sections_synced: usize,
    /// Brand-new associations whose data was seeded with empty values.
    pub associations_seeded: usize,
    /// Associations soft-deleted because their section left the descriptor.
    pub associations_pruned: u64,
    /// Templates whose descriptor was rejected; the run continued without
    /// them.
    pub skipped: Vec<SkippedTemplate>,
}

impl SyncReport {
    /// Total templates matched to a directory this run.
    pub fn templates_seen(&self) -> usize {
        self.templates_restored + self.templates_synced
    }

    /// Returns true when every descriptor parsed cleanly.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// A template whose configuration descriptor was rejected during a run.
#[derive(Debug, Clone)]
pub struct SkippedTemplate {
    /// The template directory name.
    pub folder_name: String,
    /// Why the descriptor was rejected.
    pub message: String,
}

/// Orchestrates scanner, parser, and catalog store into one convergent
/// synchronization pass.
///
/// Runs are sequential and must be serialized by the caller: the
/// update-or-create-by-key and seen/complement pruning steps are only
/// correct under mutual exclusion with other writers of the same rows.
pub struct CatalogSync {
    store: DynCatalogStore,
    config: SyncConfig,
}

impl CatalogSync {
    /// Creates a sync pass over the given store and template root.
    pub fn new(store: DynCatalogStore, config: SyncConfig) -> Self {
        Self { store, config }
    }

    /// Runs one full catalog sync.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` when the template root is unreadable and
    /// `SyncError::Storage` when the catalog store fails; both abort the
    /// run. Per-template configuration errors do not abort: they are logged,
    /// recorded in the report, and the scan continues.
    #[instrument(skip(self), fields(root = %self.config.root.display()))]
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let scanner = Scanner::new(&self.config.root)
            .with_dynamic_marker(self.config.dynamic_marker.as_str());
        let scan = scanner.scan()?;

        let mut report = SyncReport::default();
        let mut seen_templates: HashSet<TemplateId> = HashSet::new();

        for entry in scan {
            let dir = entry?;
            let template = self.resolve_template(&dir, &mut report).await?;
            seen_templates.insert(template.id);

            match self.ingest_directory(&dir, &template, &mut report).await {
                Ok(()) => {}
                Err(SyncError::Configuration { template, message }) => {
                    warn!(
                        template = %template,
                        error = %message,
                        "Skipping template with invalid configuration"
                    );
                    report.skipped.push(SkippedTemplate {
                        folder_name: template,
                        message,
                    });
                }
                Err(fatal) => return Err(fatal),
            }
        }

        // Templates whose directories disappeared end the run trashed.
        report.templates_pruned = self
            .store
            .soft_delete_templates_excluding(&seen_templates)
            .await?;

        info!(
            templates = report.templates_seen(),
            templates_pruned = report.templates_pruned,
            pages_created = report.pages_created,
            sections = report.sections_restored + report.sections_synced,
            associations_pruned = report.associations_pruned,
            skipped = report.skipped.len(),
            "Catalog sync completed"
        );

        Ok(report)
    }

    /// Restores a trashed template by name, or update-or-creates one.
    async fn resolve_template(
        &self,
        dir: &TemplateDir,
        report: &mut SyncReport,
    ) -> Result<Template, SyncError> {
        if let Some(trashed) = self
            .store
            .find_trashed_template_by_name(&dir.folder_name)
            .await?
        {
            let restored = self.store.restore_template(trashed.id).await?;
            debug!(template = %restored.name, "Restored trashed template");
            report.templates_restored += 1;
            return Ok(restored);
        }

        let template = self.store.upsert_template_by_name(&dir.folder_name).await?;
        report.templates_synced += 1;
        Ok(template)
    }

    /// Resolves the page and ingests the descriptor for one directory.
    async fn ingest_directory(
        &self,
        dir: &TemplateDir,
        template: &Template,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let page = if dir.is_dynamic {
            None
        } else {
            self.resolve_page(dir, template, report).await?
        };

        let Some(config_path) = &dir.config_path else {
            // No descriptor means no sections for this template.
            return Ok(());
        };

        let source = fs::read_to_string(config_path).map_err(|e| {
            SyncError::configuration(
                &dir.folder_name,
                format!("failed to read {}: {e}", config_path.display()),
            )
        })?;
        let sections = parse_sections(&dir.folder_name, &source, dir.is_dynamic)?;

        let mut seen_associations: HashSet<AssociationId> = HashSet::new();

        for (position, section) in sections.into_iter().enumerate() {
            let order = position as i64;
            let slug = format!("{}-{}", dir.folder_name, section.key);

            let row = if let Some(trashed) =
                self.store.find_trashed_section_by_slug(&slug).await?
            {
                let restored = self.store.restore_section(trashed.id).await?;
                debug!(section = %restored.slug, "Restored trashed section");
                report.sections_restored += 1;
                restored
            } else {
                let upserted = self
                    .store
                    .upsert_section_by_slug(SectionUpsert {
                        slug,
                        name: section.key.clone(),
                        field_schema: section.fields.clone(),
                        is_dynamic: section.is_dynamic,
                        order,
                    })
                    .await?;
                report.sections_synced += 1;
                upserted
            };

            if let Some(page) = &page {
                let association = self
                    .store
                    .upsert_association(page.id, row.id, order)
                    .await?;
                if association.data.is_none() {
                    // Seed editable fields once; later runs must not
                    // overwrite operator-entered values.
                    self.store
                        .set_association_data(association.id, section.fields.seed_values())
                        .await?;
                    report.associations_seeded += 1;
                }
                seen_associations.insert(association.id);
            }
        }

        if let Some(page) = &page {
            // Sections removed from the descriptor leave trashed
            // associations behind, restorable with their data intact.
            report.associations_pruned += self
                .store
                .soft_delete_associations_excluding(page.id, &seen_associations)
                .await?;
        }

        Ok(())
    }

    /// Creates the page for a newly discovered directory, or returns the
    /// existing active page. Existing pages, active or trashed, are never
    /// edited here.
    async fn resolve_page(
        &self,
        dir: &TemplateDir,
        template: &Template,
        report: &mut SyncReport,
    ) -> Result<Option<Page>, SyncError> {
        if !self.store.page_exists_by_folder(&dir.folder_name).await? {
            let page = self
                .store
                .create_page(NewPage::for_folder(
                    dir.folder_name.as_str(),
                    dir.folder_name.as_str(),
                    slugify(&dir.folder_name),
                    template.id,
                ))
                .await?;
            debug!(page = %page.title, slug = %page.slug, "Created page");
            report.pages_created += 1;
            return Ok(Some(page));
        }

        Ok(self
            .store
            .find_active_page_by_folder(&dir.folder_name)
            .await?)
    }
}
