//! Default request headers emulating a generic desktop browser.

/// User-Agent sent by `Request::apply_default_headers`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:10.0) Gecko/20100101 Firefox/10.0";

/// The default header profile, applied in this exact order. Order carries no
/// semantic weight but is fixed so runs are reproducible.
pub const DEFAULT_HEADERS: [(&str, &str); 6] = [
    ("User-Agent", DEFAULT_USER_AGENT),
    (
        "Accept",
        "text/html, application/xml;q=0.9, application/xhtml+xml, image/png, \
         image/jpeg, image/gif, image/x-xbitmap, */*;q=0.1",
    ),
    ("Accept-Language", "en-US,zh-CN,zh;q=0.9,en;q=0.8"),
    ("Accept-Charset", "GBK, utf-8, utf-16, *;q=0.1"),
    ("Accept-Encoding", "deflate, gzip, x-gzip, identity, *;q=0"),
    ("Connection", "Keep-Alive"),
];
