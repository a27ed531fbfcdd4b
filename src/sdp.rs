//! Grammar subset of SDP (RFC 8866) sufficient for offer patching:
//! `m=` lines split the blob into a session part and media sections, and
//! `a=name:value` / `a=name` lines become per-section attributes. Everything
//! else is carried along untouched; the patcher only ever appends.

use crate::error::StreamError;

pub const SCTP_PORT: u16 = 5000;
pub const MAX_MESSAGE_SIZE: u32 = 262_144;
const APPLICATION_MID: &str = "2";

#[derive(Debug, Default)]
pub struct Section<'a> {
    kind: Option<&'a str>,
    attributes: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> Section<'a> {
    /// Media type token of the `m=` line, `None` for the session part.
    pub fn kind(&self) -> Option<&'a str> {
        self.kind
    }

    /// First value for a value attribute. Flag attributes yield `None`.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, value)| *value)
    }
}

#[derive(Debug)]
pub struct Sdp<'a> {
    session: Section<'a>,
    media: Vec<Section<'a>>,
}

impl<'a> Sdp<'a> {
    pub fn parse(text: &'a str) -> Self {
        let mut session = Section::default();
        let mut media: Vec<Section<'a>> = vec![];
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if let Some(m_line) = line.strip_prefix("m=") {
                media.push(Section {
                    kind: m_line.split(' ').next(),
                    attributes: vec![],
                });
            } else if let Some(attribute) = line.strip_prefix("a=") {
                let (name, value) = match attribute.split_once(':') {
                    Some((name, value)) => (name, Some(value)),
                    None => (attribute, None),
                };
                let section = media.last_mut().unwrap_or(&mut session);
                section.attributes.push((name, value));
            }
        }
        Self { session, media }
    }

    pub fn session(&self) -> &Section<'a> {
        &self.session
    }

    pub fn media(&self) -> &[Section<'a>] {
        &self.media
    }

    pub fn has_media(&self, kind: &str) -> bool {
        self.media.iter().any(|section| section.kind() == Some(kind))
    }

    /// First value for `name`: session part first, then media sections in
    /// order. Browsers emit `a=fingerprint` at session level while aiortc
    /// and webrtc-rs emit it per media section; callers see either.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.session
            .attribute(name)
            .or_else(|| self.media.iter().find_map(|section| section.attribute(name)))
    }
}

/// The remote endpoint requires a data-channel media section to allocate
/// its stream resources, and the offer may omit one depending on transport
/// configuration. If `m=application` is present the offer is returned
/// unmodified; otherwise a section is synthesized from the ICE credentials
/// and certificate fingerprint already present in the offer.
pub fn ensure_application_section(offer: &str) -> Result<String, StreamError> {
    let sdp = Sdp::parse(offer);
    if sdp.has_media("application") {
        return Ok(offer.to_owned());
    }
    let ice_ufrag = required_attribute(&sdp, "ice-ufrag")?;
    let ice_pwd = required_attribute(&sdp, "ice-pwd")?;
    let fingerprint = required_attribute(&sdp, "fingerprint")?;

    let mut patched = offer.to_owned();
    patched.push_str(&format!(
        "m=application 9 DTLS/SCTP {SCTP_PORT}\r\n\
         c=IN IP4 0.0.0.0\r\n\
         a=ice-ufrag:{ice_ufrag}\r\n\
         a=ice-pwd:{ice_pwd}\r\n\
         a=fingerprint:{fingerprint}\r\n\
         a=setup:actpass\r\n\
         a=mid:{APPLICATION_MID}\r\n\
         a=sctp-port:{SCTP_PORT}\r\n\
         a=max-message-size:{MAX_MESSAGE_SIZE}\r\n"
    ));
    Ok(patched)
}

fn required_attribute<'a>(sdp: &Sdp<'a>, attribute: &'static str) -> Result<&'a str, StreamError> {
    sdp.attribute(attribute)
        .ok_or(StreamError::MalformedOffer { attribute })
}
