//! Platform announcements
//!
//! An announcement carries an optional display window and a stored
//! `is_active` flag computed from that window at write time. The flag
//! is what the active-set index scans; the window is re-checked at
//! query time, so a flag that has gone stale (the window elapsed after
//! the write) cannot leak an inactive announcement to readers. Updates
//! never recompute the flag on their own.

use std::sync::Arc;
use tabula_core::{EntityKind, Fields, RecordId, Result, Timestamp};
use tabula_engine::{ActiveSetQuery, ActiveWindow};
use tabula_storage::{Record, RecordStore, ScanOptions, TimeField};

use crate::schema::announcements;

/// Payload for creating an announcement
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    /// Headline
    pub title: String,
    /// Body text
    pub content: String,
    /// Severity: "info", "warning" or "alert"
    pub kind: String,
    /// Display priority, higher is more prominent
    pub priority: i64,
    /// Window start; absent means active since forever
    pub start_date: Option<Timestamp>,
    /// Window end; absent means active forever
    pub end_date: Option<Timestamp>,
    /// Target audience: "all", "premium" or "free"
    pub audience: String,
}

impl NewAnnouncement {
    /// Unbounded announcement for everyone
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            kind: "info".to_string(),
            priority: 0,
            start_date: None,
            end_date: None,
            audience: "all".to_string(),
        }
    }
}

/// Partial update to an announcement; absent fields stay untouched
///
/// Supplying new window dates does NOT recompute `is_active`; callers
/// that move the window and want the flag to follow must set
/// `is_active` themselves.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementPatch {
    /// New headline
    pub title: Option<String>,
    /// New body text
    pub content: Option<String>,
    /// New severity
    pub kind: Option<String>,
    /// New display priority
    pub priority: Option<i64>,
    /// New window start
    pub start_date: Option<Timestamp>,
    /// New window end
    pub end_date: Option<Timestamp>,
    /// Explicit flag override
    pub is_active: Option<bool>,
    /// New target audience
    pub audience: Option<String>,
}

impl AnnouncementPatch {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.set_opt(announcements::TITLE, self.title);
        fields.set_opt(announcements::CONTENT, self.content);
        fields.set_opt(announcements::KIND, self.kind);
        fields.set_opt(announcements::PRIORITY, self.priority);
        fields.set_opt(announcements::START_DATE, self.start_date);
        fields.set_opt(announcements::END_DATE, self.end_date);
        fields.set_opt(announcements::IS_ACTIVE, self.is_active);
        fields.set_opt(announcements::AUDIENCE, self.audience);
        fields
    }
}

/// Announcement facade
#[derive(Debug, Clone)]
pub struct Announcements {
    store: Arc<RecordStore>,
    active: ActiveSetQuery,
}

impl Announcements {
    /// Facade over an existing store
    pub fn new(store: Arc<RecordStore>) -> Self {
        let active = ActiveSetQuery::new(
            Arc::clone(&store),
            EntityKind::Announcement,
            announcements::BY_ACTIVE,
            announcements::START_DATE,
            announcements::END_DATE,
            Some(announcements::AUDIENCE),
        );
        Self { store, active }
    }

    /// Publish an announcement
    ///
    /// `is_active` is computed from the window against the write
    /// instant, so a future-dated announcement is born inactive.
    pub fn create(&self, announcement: NewAnnouncement) -> Result<RecordId> {
        self.store.write(EntityKind::Announcement, |table, now| {
            let window = ActiveWindow::new(announcement.start_date, announcement.end_date);
            let mut fields = Fields::new()
                .with(announcements::TITLE, announcement.title)
                .with(announcements::CONTENT, announcement.content)
                .with(announcements::KIND, announcement.kind)
                .with(announcements::PRIORITY, announcement.priority)
                .with(announcements::IS_ACTIVE, window.is_active_at(now))
                .with(announcements::AUDIENCE, announcement.audience);
            fields.set_opt(announcements::START_DATE, announcement.start_date);
            fields.set_opt(announcements::END_DATE, announcement.end_date);
            table.insert(fields, now)
        })
    }

    /// Patch an announcement; `NotFound` if the id does not exist
    pub fn update(&self, id: RecordId, patch: AnnouncementPatch) -> Result<()> {
        self.store
            .patch(EntityKind::Announcement, id, &patch.into_fields())
    }

    /// Announcements live right now for an audience
    ///
    /// `audience` of `None` skips audience filtering. Records targeted
    /// at "all" match every audience. Newest first.
    pub fn active(&self, audience: Option<&str>) -> Result<Vec<Record>> {
        self.active.query_active(audience, Timestamp::now())
    }

    /// Every announcement, live or not, newest first
    pub fn all(&self) -> Result<Vec<Record>> {
        self.store.scan_all(
            EntityKind::Announcement,
            ScanOptions::descending().sorted_by(TimeField::Created),
        )
    }

    /// Point lookup by announcement id
    pub fn get(&self, id: RecordId) -> Result<Option<Record>> {
        self.store.get_by_id(EntityKind::Announcement, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::platform_schema;
    use tabula_core::Error;

    fn announcements() -> Announcements {
        Announcements::new(Arc::new(RecordStore::with_schemas(platform_schema())))
    }

    #[test]
    fn test_unbounded_announcement_is_born_active() {
        let board = announcements();
        let id = board.create(NewAnnouncement::new("hello", "world")).unwrap();

        let record = board.get(id).unwrap().unwrap();
        assert_eq!(record.bool_field("is_active"), Some(true));
        assert_eq!(record.str_field("audience"), Some("all"));

        let active = board.active(None).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, id);
    }

    #[test]
    fn test_future_dated_announcement_is_born_inactive() {
        let board = announcements();
        let mut new = NewAnnouncement::new("later", "soon");
        new.start_date = Some(Timestamp::now().plus_millis(60_000));
        let id = board.create(new).unwrap();

        let record = board.get(id).unwrap().unwrap();
        assert_eq!(record.bool_field("is_active"), Some(false));
        assert!(board.active(None).unwrap().is_empty());
        // Still visible in the unfiltered listing
        assert_eq!(board.all().unwrap().len(), 1);
    }

    #[test]
    fn test_stale_flag_does_not_leak_to_readers() {
        let board = announcements();
        let mut new = NewAnnouncement::new("flash sale", "today only");
        new.end_date = Some(Timestamp::now().plus_millis(3_600_000));
        let id = board.create(new).unwrap();

        // Window slides into the past; the stored flag stays true
        board
            .update(
                id,
                AnnouncementPatch {
                    end_date: Some(Timestamp::now().minus_millis(1_000)),
                    ..AnnouncementPatch::default()
                },
            )
            .unwrap();

        let record = board.get(id).unwrap().unwrap();
        assert_eq!(record.bool_field("is_active"), Some(true));
        // The query-time window check filters it out anyway
        assert!(board.active(None).unwrap().is_empty());
    }

    #[test]
    fn test_audience_targeting() {
        let board = announcements();
        board.create(NewAnnouncement::new("everyone", "hi")).unwrap();
        let mut premium = NewAnnouncement::new("premium perk", "enjoy");
        premium.audience = "premium".to_string();
        board.create(premium).unwrap();

        let for_free = board.active(Some("free")).unwrap();
        assert_eq!(for_free.len(), 1);
        assert_eq!(for_free[0].str_field("title"), Some("everyone"));

        assert_eq!(board.active(Some("premium")).unwrap().len(), 2);
    }

    #[test]
    fn test_update_patches_supplied_fields_only() {
        let board = announcements();
        let id = board.create(NewAnnouncement::new("v1", "body")).unwrap();
        board
            .update(
                id,
                AnnouncementPatch {
                    title: Some("v2".to_string()),
                    priority: Some(5),
                    ..AnnouncementPatch::default()
                },
            )
            .unwrap();

        let record = board.get(id).unwrap().unwrap();
        assert_eq!(record.str_field("title"), Some("v2"));
        assert_eq!(record.i64_field("priority"), Some(5));
        assert_eq!(record.str_field("content"), Some("body"));
    }

    #[test]
    fn test_update_unknown_id_fails() {
        let board = announcements();
        let err = board
            .update(RecordId::new(), AnnouncementPatch::default())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_explicit_flag_override_revives_announcement() {
        let board = announcements();
        let mut new = NewAnnouncement::new("later", "soon");
        new.start_date = Some(Timestamp::now().plus_millis(60_000));
        let id = board.create(new).unwrap();
        assert!(board.active(None).unwrap().is_empty());

        // Clearing the window start alone would not flip the flag, so
        // the caller sets it explicitly
        board
            .update(
                id,
                AnnouncementPatch {
                    start_date: Some(Timestamp::now().minus_millis(1_000)),
                    is_active: Some(true),
                    ..AnnouncementPatch::default()
                },
            )
            .unwrap();
        assert_eq!(board.active(None).unwrap().len(), 1);
    }
}
