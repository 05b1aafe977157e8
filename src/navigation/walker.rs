//! Depth-first traversal of one letter
//!
//! Each node (course, offering, term, section) is its own error boundary:
//! a failure is logged with the action and node path, counted, and the
//! walk continues with the next sibling. Every node entered through a
//! document action is left through its return action, whether or not
//! anything inside it succeeded.

use crate::auth::Authenticator;
use crate::crawler::PartitionKey;
use crate::extract::{AmbientContext, DepartmentRecord, Extractor, Record};
use crate::navigation::actions::{self, Event, Level, TERM_PARAM};
use crate::navigation::listing::{self, CourseEntry, DepartmentEntry, SectionEntry, TermOption};
use crate::navigation::machine::{ensure_kind, Navigator};
use crate::navigation::{require_action, ActionCode, NavError, NavigationResult, NodeKind};
use crate::output::PartitionStats;
use crate::state::{ReturnFrame, Session};
use crate::storage::{RecordKey, Sink};
use crate::WalkerError;
use std::sync::Arc;

/// True for course titles the walker must not enter
///
/// A title is a placeholder when it is empty or contains `placeholder`,
/// compared case-insensitively.
pub fn is_placeholder_title(title: &str, placeholder: &str) -> bool {
    let title = title.trim();
    title.is_empty()
        || (!placeholder.is_empty() && title.to_lowercase().contains(&placeholder.to_lowercase()))
}

/// Walks whole partitions, one session each
pub struct CatalogWalker {
    navigator: Navigator,
    authenticator: Arc<dyn Authenticator>,
    extractor: Arc<dyn Extractor>,
    sink: Arc<dyn Sink>,
    placeholder_title: String,
}

impl CatalogWalker {
    pub fn new(
        navigator: Navigator,
        authenticator: Arc<dyn Authenticator>,
        extractor: Arc<dyn Extractor>,
        sink: Arc<dyn Sink>,
        placeholder_title: impl Into<String>,
    ) -> Self {
        Self {
            navigator,
            authenticator,
            extractor,
            sink,
            placeholder_title: placeholder_title.into(),
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Walks one letter from a fresh session
    ///
    /// Fails only when no session can be established or the letter listing
    /// cannot be reached; everything below is caught per node.
    ///
    /// # Arguments
    ///
    /// * `key` - The letter to walk
    ///
    /// # Returns
    ///
    /// * `Ok(PartitionStats)` - Counters for every node visited, skipped or failed
    /// * `Err(WalkerError)` - Authentication or the letter listing failed
    pub async fn walk(&self, key: PartitionKey) -> Result<PartitionStats, WalkerError> {
        let token = self
            .authenticator
            .authenticate(&key)
            .await
            .map_err(NavError::Authentication)?;

        let mut session = Session::new(key.to_string(), token);
        let mut stats = PartitionStats::new();

        let outcome = self.walk_letter(&mut session, key, &mut stats).await;
        stats.requests = session.requests();

        if session.path().depth() != 0 {
            tracing::warn!(
                "{}: walk ended with {} pending return frames",
                session.label(),
                session.path().depth()
            );
        }

        outcome?;
        tracing::info!(
            "Partition {} done: {} requests, {} courses, {} sections, {} errors",
            key,
            stats.requests,
            stats.courses_visited,
            stats.section_records,
            stats.total_errors()
        );
        Ok(stats)
    }

    async fn walk_letter(
        &self,
        session: &mut Session,
        key: PartitionKey,
        stats: &mut PartitionStats,
    ) -> Result<(), NavError> {
        self.navigator.enter_root(session).await?;

        let letter_action = actions::letter_action(key.letter()).ok_or(
            NavError::MissingTransition {
                level: Level::Letter,
                event: Event::Enter,
            },
        )?;
        let letter_page = self.navigator.enter(session, &letter_action, &[]).await?;
        expect_kind(&letter_page, NodeKind::Listing, &letter_action)?;

        let expand = require_action(Level::Letter, Event::Expand)?;
        let expanded = self.navigator.enter(session, &expand, &[]).await?;
        expect_kind(&expanded, NodeKind::Listing, &expand)?;

        let departments = listing::departments_in(expanded.document());
        tracing::info!(
            "Letter {} has {} departments",
            key,
            departments.len()
        );

        let ctx = AmbientContext::for_letter(key.letter());
        for department in &departments {
            self.visit_department(session, department, &ctx, stats)
                .await;
        }

        Ok(())
    }

    async fn visit_department(
        &self,
        session: &mut Session,
        department: &DepartmentEntry,
        ctx: &AmbientContext,
        stats: &mut PartitionStats,
    ) {
        stats.departments += 1;
        let ctx = ctx.with_department(department);
        tracing::debug!(
            "{}: department {} - {} ({} courses)",
            session.label(),
            department.code,
            department.name,
            department.courses.len()
        );

        let record = Record::Department(DepartmentRecord {
            code: department.code.clone(),
            name: department.name.clone(),
            letter: ctx.letter.map(String::from).unwrap_or_default(),
        });
        if self.write(&record, &ctx, stats) {
            stats.department_records += 1;
        }

        for course in &department.courses {
            self.visit_course(session, course, &ctx, stats).await;
        }
    }

    /// Course boundary: enter, walk, and always leave
    async fn visit_course(
        &self,
        session: &mut Session,
        course: &CourseEntry,
        ctx: &AmbientContext,
        stats: &mut PartitionStats,
    ) {
        let ctx = ctx.with_course(course);

        if is_placeholder_title(&course.title, &self.placeholder_title) {
            tracing::debug!(
                "{}: skipping placeholder course {}",
                session.label(),
                ctx.describe()
            );
            stats.courses_skipped += 1;
            return;
        }
        stats.courses_visited += 1;

        let (return_action, leave_branch) = match (
            require_action(Level::Course, Event::Return),
            require_action(Level::Course, Event::LeaveBranch),
        ) {
            (Ok(r), Ok(l)) => (r, l),
            (Err(e), _) | (_, Err(e)) => {
                self.report(session, &ctx, &e, stats);
                return;
            }
        };

        let entered = self.navigator.enter(session, &course.action, &[]).await;

        let frame = match &entered {
            Ok(page) if page.kind() == NodeKind::Branch => ReturnFrame {
                level: Level::Course,
                action: leave_branch,
                expect: NodeKind::Listing,
            },
            _ => ReturnFrame {
                level: Level::Course,
                action: return_action,
                expect: NodeKind::Listing,
            },
        };
        self.navigator.descend(session, frame);

        let outcome = match entered {
            Ok(page) => match page.kind() {
                NodeKind::Branch => self.visit_branch(session, page, &ctx, stats).await,
                NodeKind::Leaf | NodeKind::Detail => {
                    self.visit_detail(session, page, &ctx, stats).await
                }
                NodeKind::Listing => Err(unexpected(&course.action, NodeKind::Listing)),
            },
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            self.report(session, &ctx, &e, stats);
        }

        self.leave(session, &ctx, stats).await;
    }

    /// A course with several academic-level offerings
    async fn visit_branch(
        &self,
        session: &mut Session,
        page: NavigationResult,
        ctx: &AmbientContext,
        stats: &mut PartitionStats,
    ) -> Result<(), NavError> {
        stats.branches += 1;
        let offerings = page.child_actions().to_vec();
        if offerings.is_empty() {
            return Err(NavError::Classification {
                action: ctx.describe(),
                reason: "branch page lists no offerings".to_string(),
            });
        }

        let return_action = require_action(Level::Offering, Event::Return)?;

        for offering in offerings {
            stats.offerings += 1;
            let ctx = ctx.with_academic_level(&offering.label);

            let entered = self.navigator.enter(session, &offering.action, &[]).await;
            self.navigator.descend(
                session,
                ReturnFrame {
                    level: Level::Offering,
                    action: return_action.clone(),
                    expect: NodeKind::Branch,
                },
            );

            let outcome = match entered {
                Ok(page) if page.kind().is_detail_like() => {
                    self.visit_detail(session, page, &ctx, stats).await
                }
                Ok(page) => Err(unexpected(&offering.action, page.kind())),
                Err(e) => Err(e),
            };

            if let Err(e) = outcome {
                self.report(session, &ctx, &e, stats);
            }

            self.leave(session, &ctx, stats).await;
        }

        Ok(())
    }

    /// A course detail page, then its terms when it has sections
    async fn visit_detail(
        &self,
        session: &mut Session,
        page: NavigationResult,
        ctx: &AmbientContext,
        stats: &mut PartitionStats,
    ) -> Result<(), NavError> {
        let mut ctx = ctx.at(Level::Course);

        match self.extractor.extract(page.document(), page.kind(), &ctx) {
            Some(record) => {
                if let Record::Course(course) = &record {
                    ctx.absorb_course(course);
                }
                if self.write(&record, &ctx, stats) {
                    stats.course_records += 1;
                }
            }
            None => {
                tracing::warn!(
                    "{}: no course data extracted at {}",
                    session.label(),
                    ctx.describe()
                );
                stats.extraction_failures += 1;
            }
        }

        if page.kind() != NodeKind::Leaf {
            tracing::debug!("{}: {} has no sections", session.label(), ctx.describe());
            return Ok(());
        }

        let view_sections = require_action(Level::Course, Event::ViewSections)?;
        let term_page = self.navigator.enter(session, &view_sections, &[]).await?;

        // The term page may still carry the course header
        let terms = listing::terms_in(term_page.document());
        if terms.is_empty() && term_page.kind() != NodeKind::Listing {
            return Err(unexpected(&view_sections, term_page.kind()));
        }
        tracing::debug!(
            "{}: {} terms for {}",
            session.label(),
            terms.len(),
            ctx.describe()
        );

        for term in &terms {
            stats.terms += 1;
            if let Err(e) = self.visit_term(session, term, &ctx, stats).await {
                self.report(session, &ctx, &e, stats);
            }
        }

        Ok(())
    }

    /// Term boundary: select the term, expand once per session, walk sections
    async fn visit_term(
        &self,
        session: &mut Session,
        term: &TermOption,
        ctx: &AmbientContext,
        stats: &mut PartitionStats,
    ) -> Result<(), NavError> {
        let extra = vec![(TERM_PARAM.to_string(), term.value.clone())];

        let select = require_action(Level::Term, Event::Enter)?;
        let mut page = self.navigator.enter(session, &select, &extra).await?;

        if !session.sections_expanded() && listing::sections_collapsed_in(page.document()) {
            let toggle = require_action(Level::Term, Event::Expand)?;
            tracing::debug!("{}: expanding section list", session.label());
            page = self.navigator.enter(session, &toggle, &extra).await?;
            session.mark_sections_expanded();
        }

        let sections = listing::sections_in(page.document());
        tracing::debug!(
            "{}: term {} has {} sections",
            session.label(),
            term.label,
            sections.len()
        );

        // Closing a section restores this page, whatever it classified as
        let listing_kind = page.kind();
        for section in &sections {
            self.visit_section(session, section, &extra, listing_kind, ctx, stats)
                .await;
        }

        Ok(())
    }

    /// Section boundary: enter, extract, and always close
    async fn visit_section(
        &self,
        session: &mut Session,
        section: &SectionEntry,
        extra: &[(String, String)],
        listing_kind: NodeKind,
        ctx: &AmbientContext,
        stats: &mut PartitionStats,
    ) {
        stats.sections_visited += 1;
        let ctx = ctx.with_section(&section.name);

        let close = match require_action(Level::Section, Event::Return) {
            Ok(action) => action,
            Err(e) => {
                self.report(session, &ctx, &e, stats);
                return;
            }
        };

        let entered = self.navigator.enter(session, &section.action, extra).await;
        self.navigator.descend(
            session,
            ReturnFrame {
                level: Level::Section,
                action: close,
                expect: listing_kind,
            },
        );

        match entered {
            Ok(page) if page.kind() == NodeKind::Detail => {
                match self.extractor.extract(page.document(), page.kind(), &ctx) {
                    Some(record) => {
                        if self.write(&record, &ctx, stats) {
                            stats.section_records += 1;
                        }
                    }
                    None => {
                        tracing::warn!(
                            "{}: no section data extracted at {}",
                            session.label(),
                            ctx.describe()
                        );
                        stats.extraction_failures += 1;
                    }
                }
            }
            Ok(page) => {
                let e = unexpected(&section.action, page.kind());
                self.report(session, &ctx, &e, stats);
            }
            Err(e) => self.report(session, &ctx, &e, stats),
        }

        self.leave(session, &ctx, stats).await;
    }

    /// Pops the innermost frame, replays it and checks where it landed
    async fn leave(&self, session: &mut Session, ctx: &AmbientContext, stats: &mut PartitionStats) {
        let Some(ascent) = self.navigator.ascend(session).await else {
            tracing::warn!("{}: no return frame at {}", session.label(), ctx.describe());
            return;
        };
        stats.record_return(ascent.frame.level);

        let checked = ascent
            .result
            .and_then(|page| ensure_kind(&page, ascent.frame.expect, &ascent.frame.action));
        if let Err(e) = checked {
            self.report(session, ctx, &e, stats);
        }
    }

    /// Writes a record, counting a failure; returns whether it was written
    fn write(&self, record: &Record, ctx: &AmbientContext, stats: &mut PartitionStats) -> bool {
        let key = RecordKey::for_record(record);
        match self.sink.write(&key, record) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to write {} at {}: {}", key, ctx.describe(), e);
                stats.sink_errors += 1;
                false
            }
        }
    }

    fn report(
        &self,
        session: &Session,
        ctx: &AmbientContext,
        error: &NavError,
        stats: &mut PartitionStats,
    ) {
        tracing::warn!(
            "{}: {} error at {}: {}",
            session.label(),
            error.kind(),
            ctx.describe(),
            error
        );
        stats.record_error(error);
    }
}

fn expect_kind(page: &NavigationResult, kind: NodeKind, action: &ActionCode) -> Result<(), NavError> {
    if page.kind() == kind {
        Ok(())
    } else {
        Err(unexpected(action, page.kind()))
    }
}

fn unexpected(action: &ActionCode, found: NodeKind) -> NavError {
    NavError::Classification {
        action: action.to_string(),
        reason: format!("unexpected {} page", found),
    }
}
