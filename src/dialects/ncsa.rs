//! NCSA common log format.
//!
//! Directives: `%h %l %u %t %r %>s %s %b`. Identifiers follow the
//! `>?[_a-zA-Z][_a-zA-Z0-9]*` grammar, so `%Dusec` is read as one (unknown)
//! directive here; the Apache dialect reads it as `%D` followed by `usec`.

use super::Dialect;
use crate::FieldId;

pub const REMOTE_HOST: FieldId = FieldId(0);
pub const LOGNAME: FieldId = FieldId(1);
pub const USERID: FieldId = FieldId(2);
/// Whole bracketed timestamp, e.g. `10/Oct/2000:13:55:00 -0730`.
pub const FULLTIME: FieldId = FieldId(3);
pub const LOCALTIME: FieldId = FieldId(4);
pub const GMTOFFSET: FieldId = FieldId(5);
/// Whole request line, e.g. `GET /index.html HTTP/1.0`.
pub const REQUEST: FieldId = FieldId(6);
pub const METHOD: FieldId = FieldId(7);
/// Request target without the scheme/host root: path plus query string.
pub const URL: FieldId = FieldId(8);
pub const PROTOCOL: FieldId = FieldId(9);
pub const STATUS: FieldId = FieldId(10);
pub const NUMBYTES: FieldId = FieldId(11);
pub const QUERY_STRING: FieldId = FieldId(12);
pub const URL_PATH: FieldId = FieldId(13);
/// `scheme://host` prefix of an absolute request target; absent otherwise.
pub const URL_ROOT: FieldId = FieldId(14);

/// First id free for a derived dialect.
pub const NUM_FIELDS: usize = 15;

/// Canonical NCSA common log format.
pub const COMMON_FORMAT: &str = "%h %l %u %t \"%r\" %>s %b";

pub(crate) const FIELD_NAMES: [&str; NUM_FIELDS] = [
    "remoteHost",
    "logname",
    "userid",
    "time",
    "localtime",
    "gmtoffset",
    "request",
    "requestMethod",
    "requestUrl",
    "requestProtocol",
    "status",
    "bytes",
    "requestQueryString",
    "requestUrlPath",
    "requestUrlRoot",
];

pub(crate) fn build() -> Dialect {
    let directives = vec![
        directive!("h" => r"(?P<remoteHost>[^\s]*)", binds: [("remoteHost", REMOTE_HOST)]),
        directive!("l" => r"(?P<logname>[^\s]*)", binds: [("logname", LOGNAME)]),
        directive!("u" => r"(?P<userid>[^\s]*)", binds: [("userid", USERID)]),
        directive!(
            "t" => r"\[(?P<time>(?P<localtime>\d+/[a-zA-Z]+/\d\d\d\d:\d\d:\d\d:\d\d)\s+(?P<gmtoffset>[+-]?\d\d\d\d))\]",
            binds: [("time", FULLTIME), ("localtime", LOCALTIME), ("gmtoffset", GMTOFFSET)]
        ),
        directive!(
            "r" => r"(?P<request>(?P<requestMethod>[A-Z]+)\s+(?P<requestUrlRoot>[a-z]+://[^/\s]+)?(?P<requestUrl>(?P<requestUrlPath>[^\s?]+)(?P<requestQueryString>\?[^\s]*|))\s+(?P<requestProtocol>[\w/.]+))",
            binds: [
                ("request", REQUEST),
                ("requestMethod", METHOD),
                ("requestUrl", URL),
                ("requestProtocol", PROTOCOL),
                ("requestUrlRoot", URL_ROOT),
                ("requestUrlPath", URL_PATH),
                ("requestQueryString", QUERY_STRING),
            ]
        ),
        directive!(">s" => r"(?P<status>\d+|-)", binds: [("status", STATUS)]),
        directive!("s" => r"(?P<firstStatus>\d+|-)", binds: [("firstStatus", STATUS)]),
        directive!("b" => r"(?P<bytes>\d+|-)", binds: [("bytes", NUMBYTES)]),
    ];

    Dialect::new("ncsa", regex!(r"^(?:>?[_a-zA-Z][_a-zA-Z0-9]*)"), directives, &FIELD_NAMES, COMMON_FORMAT)
}
