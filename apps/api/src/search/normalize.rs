use crate::search::models::{JobRecord, RawJob, RawLink};

/// Flattens a raw upstream job into a `JobRecord`.
pub fn normalize(job: RawJob) -> JobRecord {
    let apply_links = links(job.apply_options.as_deref());
    let related_links = links(job.related_links.as_deref());

    // Only the first related link and first apply option are candidates,
    // even when that entry carries no link.
    let primary = non_empty(job.link.as_deref())
        .or_else(|| first_link(job.related_links.as_deref()))
        .or_else(|| first_link(job.apply_options.as_deref()))
        .or_else(|| non_empty(job.share_url.as_deref()))
        .map(str::to_string);

    let mut all_links: Vec<String> = Vec::new();
    let candidates = apply_links
        .iter()
        .chain(related_links.iter())
        .copied()
        .chain(non_empty(job.share_url.as_deref()))
        .chain(non_empty(job.registration_form.as_deref()));
    for link in candidates {
        if !all_links.iter().any(|seen| seen == link) {
            all_links.push(link.to_string());
        }
    }

    let extensions = job.detected_extensions.unwrap_or_default();

    JobRecord {
        title: job.title,
        company: job.company_name,
        location: job.location,
        description: job.description,
        link: primary,
        all_links,
        posted_at: extensions.posted_at,
        salary: extensions.salary,
        job_type: extensions.schedule_type,
        thumbnail: job.thumbnail,
    }
}

/// Non-empty links in upstream order.
fn links(raw: Option<&[RawLink]>) -> Vec<&str> {
    raw.unwrap_or_default()
        .iter()
        .filter_map(|l| non_empty(l.link.as_deref()))
        .collect()
}

fn first_link(raw: Option<&[RawLink]>) -> Option<&str> {
    raw.and_then(|links| links.first())
        .and_then(|l| non_empty(l.link.as_deref()))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
