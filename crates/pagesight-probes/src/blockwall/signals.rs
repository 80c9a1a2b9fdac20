//! The probe battery. Each probe inspects one wall family and returns at
//! most one signal; ordering and confidence arbitration live in the
//! driver.
//!
//! Text probes read a captured [`PageText`] so the page text is walked
//! once. Element probes search the light tree the way an attribute
//! selector would.

use pagesight_dom::{DomWalker, NodeId, PageDom, round_half_up};

use super::verdict::{BlockKind, Signal};
use super::vis::{is_element_visible, is_in_center_region};

/// Page text captured once for the text probes.
pub(super) struct PageText {
    pub title: String,
    pub body: String,
    pub body_lower: String,
    /// Character count of the raw body text. Wall pages are short; long
    /// pages mentioning a wall are usually articles about one.
    pub char_len: usize,
}

impl PageText {
    /// A missing body reads as empty text.
    pub(super) fn capture<D: PageDom>(dom: &D) -> Self {
        let title = dom.title().to_string();
        let body = dom.body().map(|b| dom.inner_text(b)).unwrap_or_default();
        let body_lower = body.to_lowercase();
        let char_len = body.chars().count();
        Self { title, body, body_lower, char_len }
    }
}

pub(super) fn cloudflare_challenge_title(text: &PageText) -> Option<Signal> {
    if !text.title.to_lowercase().contains("just a moment") {
        return None;
    }
    let hit = text.body_lower.contains("verify you are human")
        || text.body_lower.contains("checking your browser")
        || (text.body_lower.contains("cloudflare") && text.char_len < 1000);
    hit.then(|| Signal {
        kind: BlockKind::CloudflareChallenge,
        confidence: 95,
        indicator: "title: Just a moment + Cloudflare verification text".to_string(),
    })
}

pub(super) fn cloudflare_block_text(text: &PageText) -> Option<Signal> {
    let hit = (text.body.contains("you have been blocked") || text.body.contains("Access denied"))
        && text.body.contains("Cloudflare")
        && text.body.contains("Ray ID");
    hit.then(|| Signal {
        kind: BlockKind::CloudflareBlock,
        confidence: 95,
        indicator: "text: Cloudflare block page with Ray ID".to_string(),
    })
}

pub(super) fn cloudflare_challenge_form<D: PageDom>(dom: &D) -> Option<Signal> {
    let candidates = [
        ("#challenge-form", first_with_id(dom, "challenge-form")),
        ("#cf-challenge-running", first_with_id(dom, "cf-challenge-running")),
        (".cf-browser-verification", first_with_class(dom, "cf-browser-verification")),
    ];
    for (selector, found) in candidates {
        if let Some(el) = found {
            if is_element_visible(dom, el, 0.0) {
                return Some(Signal {
                    kind: BlockKind::CloudflareChallenge,
                    confidence: 90,
                    indicator: format!("selector: {selector} (active challenge)"),
                });
            }
        }
    }
    None
}

pub(super) fn cloudflare_turnstile<D: PageDom>(dom: &D) -> Option<Signal> {
    let el = DomWalker::light_tree(dom)
        .map(|s| s.node)
        .find(|&n| dom.has_class(n, "cf-turnstile") && dom.attr(n, "data-sitekey").is_some())?;
    if !is_element_visible(dom, el, 100.0) {
        return None;
    }
    let iframe = first_descendant_iframe(dom, el)?;
    is_element_visible(dom, iframe, 100.0).then(|| Signal {
        kind: BlockKind::CloudflareTurnstile,
        confidence: 85,
        indicator: "selector: .cf-turnstile with visible iframe (blocking)".to_string(),
    })
}

pub(super) fn recaptcha_checkbox<D: PageDom>(dom: &D) -> Option<Signal> {
    let el = DomWalker::light_tree(dom).map(|s| s.node).find(|&n| {
        dom.has_class(n, "recaptcha-checkbox") || dom.has_class(n, "recaptcha-checkbox-border")
    })?;
    is_element_visible(dom, el, 20.0).then(|| Signal {
        kind: BlockKind::RecaptchaV2,
        confidence: 90,
        indicator: "selector: recaptcha checkbox (v2, blocking)".to_string(),
    })
}

/// Size-based triage of recaptcha frames: the small corner badge does not
/// block, the anchor checkbox and the image challenge do.
pub(super) fn recaptcha_iframes<D: PageDom>(dom: &D) -> Option<Signal> {
    for id in DomWalker::light_tree(dom).map(|s| s.node) {
        let data = dom.node(id);
        if !data.tag_is("iframe") {
            continue;
        }
        let Some(src) = dom.attr(id, "src") else {
            continue;
        };
        if !src.contains("recaptcha") {
            continue;
        }
        if !is_element_visible(dom, id, 0.0) {
            continue;
        }
        let rect = data.rect;
        let src = src.to_lowercase();
        let (w, h) = (round_half_up(rect.width), round_half_up(rect.height));
        if src.contains("/anchor") && rect.width > 250.0 && rect.height > 60.0 {
            return Some(Signal {
                kind: BlockKind::RecaptchaV2,
                confidence: 85,
                indicator: format!("iframe: recaptcha v2 anchor ({w}x{h}px, blocking)"),
            });
        }
        if src.contains("/bframe") && rect.width > 350.0 && rect.height > 400.0 {
            return Some(Signal {
                kind: BlockKind::RecaptchaV2,
                confidence: 90,
                indicator: format!("iframe: recaptcha v2 bframe ({w}x{h}px, blocking)"),
            });
        }
        if rect.width > 300.0 && rect.height > 300.0 && is_in_center_region(dom, id) {
            return Some(Signal {
                kind: BlockKind::RecaptchaV2,
                confidence: 75,
                indicator: format!("iframe: large recaptcha in center ({w}x{h}px, likely blocking)"),
            });
        }
    }
    None
}

pub(super) fn recaptcha_text(text: &PageText) -> Option<Signal> {
    let hit = (text.body_lower.contains("please complete the captcha")
        || text.body_lower.contains("complete the captcha above")
        || text.body_lower.contains("solve the captcha")
        || text.body_lower.contains("verify you are not a robot"))
        && text.char_len < 3000;
    hit.then(|| Signal {
        kind: BlockKind::Recaptcha,
        confidence: 80,
        indicator: "text: explicit captcha completion request".to_string(),
    })
}

pub(super) fn hcaptcha_widget<D: PageDom>(dom: &D) -> Option<Signal> {
    let sitekey = DomWalker::light_tree(dom)
        .map(|s| s.node)
        .find(|&n| dom.has_class(n, "h-captcha") && dom.attr(n, "data-sitekey").is_some());
    let candidates = [(".h-captcha[data-sitekey]", sitekey), ("#hcaptcha", first_with_id(dom, "hcaptcha"))];
    for (selector, found) in candidates {
        let Some(el) = found else { continue };
        if !is_element_visible(dom, el, 100.0) {
            continue;
        }
        if let Some(iframe) = first_descendant_iframe(dom, el) {
            if is_element_visible(dom, iframe, 100.0) {
                return Some(Signal {
                    kind: BlockKind::Hcaptcha,
                    confidence: 85,
                    indicator: format!("selector: {selector} with visible iframe (blocking)"),
                });
            }
        }
    }
    None
}

pub(super) fn funcaptcha_widget<D: PageDom>(dom: &D) -> Option<Signal> {
    let candidates = [
        ("#EnforcementChallenge", first_with_id(dom, "EnforcementChallenge")),
        ("iframe[src*=\"arkoselabs.com\"]", first_iframe_with_src(dom, "arkoselabs.com")),
        ("iframe[src*=\"funcaptcha.com\"]", first_iframe_with_src(dom, "funcaptcha.com")),
    ];
    for (selector, found) in candidates {
        if let Some(el) = found {
            if is_element_visible(dom, el, 200.0) {
                return Some(Signal {
                    kind: BlockKind::Funcaptcha,
                    confidence: 85,
                    indicator: format!("selector: {selector} (visible, blocking)"),
                });
            }
        }
    }
    None
}

pub(super) fn aws_title(text: &PageText) -> Option<Signal> {
    if !text.title.contains("Human Verification") {
        return None;
    }
    let hit = text.body.contains("confirm you are human") || text.body.contains("Amazon");
    hit.then(|| Signal {
        kind: BlockKind::AwsCaptcha,
        confidence: 90,
        indicator: "title: Human Verification (Amazon WAF)".to_string(),
    })
}

pub(super) fn aws_containers<D: PageDom>(dom: &D) -> Option<Signal> {
    let candidates = [
        ("#captcha-container", first_with_id(dom, "captcha-container")),
        (".amzn-captcha-lang-selector", first_with_class(dom, "amzn-captcha-lang-selector")),
    ];
    for (selector, found) in candidates {
        let Some(el) = found else { continue };
        if !is_element_visible(dom, el, 0.0) {
            continue;
        }
        let own_text = dom.text_content(el).to_lowercase();
        if own_text.contains("captcha") || own_text.contains("verification") {
            return Some(Signal {
                kind: BlockKind::AwsCaptcha,
                confidence: 85,
                indicator: format!("selector: {selector} (visible, blocking)"),
            });
        }
    }
    None
}

pub(super) fn geetest_widget<D: PageDom>(dom: &D) -> Option<Signal> {
    for class in ["geetest_holder", "geetest_widget", "geetest_radar_tip"] {
        if let Some(el) = first_with_class(dom, class) {
            if is_element_visible(dom, el, 100.0) {
                return Some(Signal {
                    kind: BlockKind::Geetest,
                    confidence: 80,
                    indicator: format!("selector: .{class} (visible, blocking)"),
                });
            }
        }
    }
    None
}

pub(super) fn datadome_widget<D: PageDom>(dom: &D) -> Option<Signal> {
    let el = first_with_class(dom, "dd-captcha")?;
    is_element_visible(dom, el, 100.0).then(|| Signal {
        kind: BlockKind::Datadome,
        confidence: 85,
        indicator: "element: .dd-captcha (visible, blocking)".to_string(),
    })
}

pub(super) fn datadome_text(text: &PageText) -> Option<Signal> {
    let hit = text.body_lower.contains("datadome")
        && (text.body_lower.contains("blocked") || text.body_lower.contains("verify"))
        && text.char_len < 2000;
    hit.then(|| Signal {
        kind: BlockKind::Datadome,
        confidence: 80,
        indicator: "text: DataDome block page".to_string(),
    })
}

pub(super) fn access_blocked_text(text: &PageText) -> Option<Signal> {
    let hit = (text.body_lower.contains("access blocked")
        || text.body_lower.contains("access denied"))
        && text.char_len < 1500;
    hit.then(|| Signal {
        kind: BlockKind::AccessBlocked,
        confidence: 85,
        indicator: "text: access blocked/denied (short dedicated page)".to_string(),
    })
}

pub(super) fn sucuri_text(text: &PageText) -> Option<Signal> {
    let hit = text.body_lower.contains("sucuri")
        && (text.body_lower.contains("website firewall")
            || text.body_lower.contains("access denied"));
    hit.then(|| Signal {
        kind: BlockKind::SucuriFirewall,
        confidence: 90,
        indicator: "text: Sucuri Website Firewall block".to_string(),
    })
}

pub(super) fn forbidden_403(text: &PageText) -> Option<Signal> {
    if !text.title.contains("403") && !text.title.contains("Forbidden") {
        return None;
    }
    let hit = (text.body_lower.contains("forbidden") || text.body_lower.contains("access denied"))
        && text.char_len < 2000;
    hit.then(|| Signal {
        kind: BlockKind::AccessDenied403,
        confidence: 85,
        indicator: "title: 403 + forbidden (dedicated page)".to_string(),
    })
}

pub(super) fn device_verification_text(text: &PageText) -> Option<Signal> {
    let hit = (text.body_lower.contains("unusual activity")
        || text.body_lower.contains("automated requests"))
        && (text.body_lower.contains("verify") || text.body_lower.contains("device"))
        && text.char_len < 2000;
    hit.then(|| Signal {
        kind: BlockKind::DeviceVerification,
        confidence: 85,
        indicator: "text: unusual activity verification (blocking)".to_string(),
    })
}

/// Reddit's security interstitial has no captcha widget; it is recognized
/// by its fixed structure of headline, login link, and support link.
pub(super) fn reddit_block<D: PageDom>(dom: &D) -> Option<Signal> {
    let headline = DomWalker::light_tree(dom).map(|s| s.node).find(|&n| {
        dom.node(n).tag_is("div")
            && dom.has_class(n, "font-bold")
            && dom.has_class(n, "text-24")
            && dom.has_class(n, "text-neutral-content-strong")
    });
    let login = DomWalker::light_tree(dom).map(|s| s.node).find(|&n| {
        dom.node(n).tag_is("a")
            && dom.attr(n, "href").as_deref() == Some("https://www.reddit.com/login/")
    });
    let ticket = DomWalker::light_tree(dom).map(|s| s.node).find(|&n| {
        dom.node(n).tag_is("a")
            && dom.attr(n, "href").is_some_and(|h| {
                h.contains("support.reddithelp.com") && h.contains("requests/new")
            })
    });
    (headline.is_some() && login.is_some() && ticket.is_some()).then(|| Signal {
        kind: BlockKind::RedditSecurityBlock,
        confidence: 95,
        indicator: "structure: Reddit security block page".to_string(),
    })
}

fn first_with_id<D: PageDom>(dom: &D, id_value: &str) -> Option<NodeId> {
    DomWalker::light_tree(dom)
        .map(|s| s.node)
        .find(|&n| dom.attr(n, "id").as_deref() == Some(id_value))
}

fn first_with_class<D: PageDom>(dom: &D, class: &str) -> Option<NodeId> {
    DomWalker::light_tree(dom).map(|s| s.node).find(|&n| dom.has_class(n, class))
}

fn first_iframe_with_src<D: PageDom>(dom: &D, needle: &str) -> Option<NodeId> {
    DomWalker::light_tree(dom).map(|s| s.node).find(|&n| {
        dom.node(n).tag_is("iframe") && dom.attr(n, "src").is_some_and(|s| s.contains(needle))
    })
}

fn first_descendant_iframe<D: PageDom>(dom: &D, root: NodeId) -> Option<NodeId> {
    DomWalker::subtree(dom, root, false).map(|s| s.node).find(|&n| dom.node(n).tag_is("iframe"))
}
