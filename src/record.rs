//! Parsed log records.
//!
//! A [`Record`] ties together a compiled format, one raw line, and that
//! line's match. It never copies the pattern or the slot tables; every
//! accessor looks up the capture index in the format and slices the line.
//!
//! Accessors come in three layers:
//!
//! - [`Record::field`]: the raw capture, `Ok(None)` when the group is bound
//!   but did not participate (e.g. the URL root of a relative request).
//! - [`Record::str_field`] / [`Record::int_field`]: absent captures read as
//!   `""`; the sentinel `-` decodes to a caller-chosen absent value.
//! - Named accessors (`remote_host`, `status`, `duration`, ...) for every
//!   field of both shipped dialects.
//!
//! Querying a field the format never referenced fails with
//! [`RecordError::FieldNotBound`]; it is never a panic.

mod decode;

use crate::engine::{CompiledFormat, MatchResult};
use crate::{CollectionKind, FieldId, RecordError, apache, ncsa};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, TimeZone, Utc};
use std::fmt;

/// One matched access-log line.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    format: &'a CompiledFormat,
    line: &'a str,
    matched: MatchResult,
}

macro_rules! text_accessors {
    ($lt:lifetime; $( $(#[$meta:meta])* $name:ident => $id:expr ),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Result<&$lt str, RecordError> {
                self.str_field($id)
            }
        )*
    };
}

macro_rules! count_accessors {
    ($( $(#[$meta:meta])* $name:ident => $id:expr ),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Result<i64, RecordError> {
                self.int_field($id, 0)
            }
        )*
    };
}

impl<'a> Record<'a> {
    /// Bind `line` to `format`.
    ///
    /// `matched` may be a result the caller already computed with
    /// [`CompiledFormat::match_line`] for this same line; otherwise the line
    /// is matched here. Returns `None` when the line does not match.
    pub fn new(format: &'a CompiledFormat, line: &'a str, matched: Option<MatchResult>) -> Option<Self> {
        let matched = match matched {
            Some(matched) => matched,
            None => format.match_line(line)?,
        };
        Some(Record { format, line, matched })
    }

    pub fn format(&self) -> &'a CompiledFormat {
        self.format
    }

    pub fn line(&self) -> &'a str {
        self.line
    }

    pub fn match_result(&self) -> &MatchResult {
        &self.matched
    }

    pub fn has_field(&self, id: FieldId) -> bool {
        self.format.has_field(id)
    }

    /// Raw capture for `id`.
    pub fn field(&self, id: FieldId) -> Result<Option<&'a str>, RecordError> {
        let slot = self.format.slot(id).ok_or_else(|| self.not_bound(id))?;
        Ok(self.capture(slot))
    }

    /// Capture for `id`, with a non-participating group read as `""`.
    pub fn str_field(&self, id: FieldId) -> Result<&'a str, RecordError> {
        Ok(self.field(id)?.unwrap_or(""))
    }

    /// Integer value of `id`; the sentinel `-` decodes to `absent`.
    pub fn int_field(&self, id: FieldId, absent: i64) -> Result<i64, RecordError> {
        let value = self.str_field(id)?;
        decode::sentinel_int(value, absent)
            .ok_or_else(|| RecordError::InvalidNumber { field: self.format.field_name(id), value: value.to_string() })
    }

    pub fn has_collection_field(&self, kind: CollectionKind, key: &str) -> bool {
        self.format.has_collection_field(kind, key)
    }

    /// Value of collection entry `key`, e.g. the `Referer` input header.
    pub fn collection_field(&self, kind: CollectionKind, key: &str) -> Result<&'a str, RecordError> {
        let slot = self
            .format
            .collection_slot(kind, key)
            .ok_or_else(|| RecordError::CollectionFieldNotBound { kind, key: key.to_string() })?;
        Ok(self.capture(slot).unwrap_or(""))
    }

    pub fn input_header(&self, name: &str) -> Result<&'a str, RecordError> {
        self.collection_field(CollectionKind::InputHeader, name)
    }

    pub fn output_header(&self, name: &str) -> Result<&'a str, RecordError> {
        self.collection_field(CollectionKind::OutputHeader, name)
    }

    pub fn env_var(&self, name: &str) -> Result<&'a str, RecordError> {
        self.collection_field(CollectionKind::Environment, name)
    }

    pub fn cookie(&self, name: &str) -> Result<&'a str, RecordError> {
        self.collection_field(CollectionKind::Cookie, name)
    }

    fn capture(&self, slot: usize) -> Option<&'a str> {
        let (start, end) = self.matched.get(slot)?;
        self.line.get(start..end)
    }

    fn not_bound(&self, id: FieldId) -> RecordError {
        RecordError::FieldNotBound { field: self.format.field_name(id) }
    }

    fn invalid_timestamp(&self, id: FieldId, value: &str) -> RecordError {
        RecordError::InvalidTimestamp { field: self.format.field_name(id), value: value.to_string() }
    }

    // --- NCSA fields ---------------------------------------------------------

    text_accessors! {
        'a;
        remote_host => ncsa::REMOTE_HOST,
        logname => ncsa::LOGNAME,
        userid => ncsa::USERID,
        /// Whole bracketed timestamp without the brackets.
        fulltime_str => ncsa::FULLTIME,
        localtime_str => ncsa::LOCALTIME,
        gmtoffset_str => ncsa::GMTOFFSET,
        request => ncsa::REQUEST,
        method => ncsa::METHOD,
        url => ncsa::URL,
        protocol => ncsa::PROTOCOL,
        status_str => ncsa::STATUS,
        numbytes_str => ncsa::NUMBYTES,
        url_path => ncsa::URL_PATH,
        /// Query string including the leading `?`; `""` when the request has none.
        query_string => ncsa::QUERY_STRING,
    }

    count_accessors! {
        status => ncsa::STATUS,
        numbytes => ncsa::NUMBYTES,
    }

    /// `scheme://host` of an absolute request target, `None` for a relative one.
    pub fn url_root(&self) -> Result<Option<&'a str>, RecordError> {
        self.field(ncsa::URL_ROOT)
    }

    /// Local date and time as written in the log.
    pub fn localtime(&self) -> Result<NaiveDateTime, RecordError> {
        let value = self.localtime_str()?;
        decode::localtime(value).ok_or_else(|| self.invalid_timestamp(ncsa::LOCALTIME, value))
    }

    /// Signed UTC offset in seconds (`-0730` → `-27000`).
    pub fn gmtoffset(&self) -> Result<i32, RecordError> {
        let value = self.gmtoffset_str()?;
        decode::gmtoffset_seconds(value).ok_or_else(|| self.invalid_timestamp(ncsa::GMTOFFSET, value))
    }

    /// Unix timestamp of the request: local time minus the UTC offset.
    pub fn gmtime(&self) -> Result<i64, RecordError> {
        Ok(self.utc_time()?.timestamp())
    }

    pub fn utc_time(&self) -> Result<DateTime<Utc>, RecordError> {
        let local = self.localtime()?;
        let offset = self.gmtoffset()?;
        Ok(local.and_utc() - TimeDelta::seconds(i64::from(offset)))
    }

    /// Timestamp in the offset it was logged with.
    pub fn timestamp(&self) -> Result<DateTime<FixedOffset>, RecordError> {
        let local = self.localtime()?;
        let offset = self.gmtoffset()?;
        FixedOffset::east_opt(offset)
            .and_then(|tz| tz.from_local_datetime(&local).single())
            .ok_or_else(|| self.invalid_timestamp(ncsa::FULLTIME, self.fulltime_str().unwrap_or_default()))
    }

    // --- Apache fields -------------------------------------------------------

    text_accessors! {
        'a;
        remote_ip => apache::REMOTE_IP,
        local_ip => apache::LOCAL_IP,
        duration_usec_str => apache::DURATION_USEC,
        duration_sec_str => apache::DURATION_SEC,
        filename => apache::FILENAME,
        handler => apache::HANDLER,
        /// Canonical `ServerName` (`%v`).
        defined_server_name => apache::DEFINED_SERVER_NAME,
        /// Server name per `UseCanonicalName` (`%V`).
        server_name => apache::SERVER_NAME,
        /// `X` aborted, `+` kept alive, `-` closed.
        connection_status => apache::CONNECTION_STATUS,
        user_agent => apache::USER_AGENT,
        referer => apache::REFERER,
        /// Response content type; header values are kept verbatim, so `-` stays `-`.
        content_type => apache::CONTENT_TYPE,
        content_length_str => apache::CONTENT_LENGTH,
    }

    count_accessors! {
        duration_usec => apache::DURATION_USEC,
        duration_sec => apache::DURATION_SEC,
        keepalive_num => apache::KEEPALIVE_NUM,
        port => apache::PORT,
        worker_pid => apache::WORKER_PID,
        received_bytes => apache::RECEIVED_BYTES,
        sent_bytes => apache::SENT_BYTES,
    }

    /// Response content length; `-` decodes to `-1` so an unknown length is
    /// distinguishable from an empty body.
    pub fn content_length(&self) -> Result<i64, RecordError> {
        self.int_field(apache::CONTENT_LENGTH, -1)
    }

    /// Time taken to serve the request, in seconds.
    ///
    /// Uses the microsecond field (`%D`) when the format has it, otherwise the
    /// whole-second field (`%T`).
    pub fn duration(&self) -> Result<f64, RecordError> {
        if self.has_field(apache::DURATION_USEC) {
            return Ok(self.duration_usec()? as f64 / 1_000_000.0);
        }
        Ok(self.duration_sec()? as f64)
    }
}

fn or_dash(value: Result<&str, RecordError>) -> &str {
    value.unwrap_or(decode::SENTINEL)
}

impl fmt::Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} \"{}\" -> {} {}",
            or_dash(self.fulltime_str()),
            or_dash(self.remote_host()),
            or_dash(self.request()),
            or_dash(self.status_str()),
            or_dash(self.numbytes_str()),
        )
    }
}
