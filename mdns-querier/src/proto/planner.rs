use crate::message::{DnsType, SUBTYPE_LABEL, SUBTYPE_PREFIX};
use crate::response::CachedResponse;

/// A single planned question: name labels plus record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Question {
    pub(crate) labels: Vec<String>,
    pub(crate) typ: DnsType,
}

impl Question {
    fn new(labels: Vec<String>, typ: DnsType) -> Self {
        Self { labels, typ }
    }
}

/// Decide the exact set of questions for one query, in packet order.
///
/// Known-answer refresh questions come first, in `services_to_resolve`
/// order; discovery questions follow, one per subtype and then the base
/// service type. An empty return means there is nothing to send.
pub(crate) fn plan_questions(
    services_to_resolve: &[CachedResponse],
    now: u64,
    send_discovery_queries: bool,
    subtypes: &[String],
    service_type_labels: &[String],
) -> Vec<Question> {
    let mut questions = Vec::new();

    for response in services_to_resolve {
        let Some(service_name) = response.service_name() else {
            continue;
        };
        let renew_txt = response
            .txt_record()
            .map_or(true, |txt| txt.needs_renewal(now));
        let renew_srv = response
            .srv_record()
            .map_or(true, |srv| srv.expiry().needs_renewal(now));

        if renew_srv && renew_txt {
            // A single ANY question lets the advertiser answer with both
            // records in one packet (RFC 6763 §12).
            questions.push(Question::new(service_name.to_vec(), DnsType::Any));
            continue;
        }
        if renew_txt {
            questions.push(Question::new(service_name.to_vec(), DnsType::Txt));
        }
        if renew_srv {
            // The hostname is unknown until SRV resolves; address questions
            // go out on the next cycle if the reply omits the records.
            // Advertisers should include them when queried for SRV,
            // although it's not a MUST requirement (RFC 6763 §12.2).
            questions.push(Question::new(service_name.to_vec(), DnsType::Srv));
        } else if !response.has_inet4_address_record() && !response.has_inet6_address_record() {
            if let Some(srv) = response.srv_record() {
                questions.push(Question::new(srv.host().to_vec(), DnsType::A));
                questions.push(Question::new(srv.host().to_vec(), DnsType::Aaaa));
            }
        }
    }

    if send_discovery_queries {
        // One question per (subtype + base type) name, then one for the
        // base type itself.
        for subtype in subtypes {
            let mut labels = Vec::with_capacity(service_type_labels.len() + 2);
            labels.push(subtype_label(subtype));
            labels.push(SUBTYPE_LABEL.to_string());
            labels.extend(service_type_labels.iter().cloned());
            questions.push(Question::new(labels, DnsType::Ptr));
        }
        questions.push(Question::new(service_type_labels.to_vec(), DnsType::Ptr));
    }

    questions
}

fn subtype_label(subtype: &str) -> String {
    if subtype.starts_with(SUBTYPE_PREFIX) {
        subtype.to_string()
    } else {
        format!("{SUBTYPE_PREFIX}{subtype}")
    }
}
