use std::time::Duration;

use crate::{dom::Dom, error::Result, timer::schedule};

/// Class of the inline message element.
pub const ERROR_CLASS: &str = "error-message";

const ERROR_COLOR: &str = "#ef4444";

/// Flag `input` as invalid and show `message` underneath it, replacing any message already shown
/// for the same field. Both are cleared after `linger`, whether or not the field was corrected.
pub fn show<D: Dom>(dom: &D, input: &D::Node, message: &str, linger: Duration) -> Result<()> {
    dom.set_style(input, "border-color", ERROR_COLOR);

    let Some(container) = dom.parent(input) else {
        tracing::debug!("form field is detached, skipping inline message");
        return Ok(());
    };

    if let Some(existing) = dom.query_in(&container, &format!(".{ERROR_CLASS}")) {
        dom.remove(&existing);
    }

    let error = dom.create_element("div")?;
    dom.add_class(&error, ERROR_CLASS);
    dom.set_text(&error, message);
    dom.set_style(&error, "color", ERROR_COLOR);
    dom.set_style(&error, "font-size", "0.875rem");
    dom.set_style(&error, "margin-top", "0.5rem");
    dom.append_child(&container, &error)?;

    schedule(dom, linger, {
        let dom = dom.clone();
        let input = input.clone();

        move || {
            dom.set_style(&input, "border-color", "");
            if dom.parent(&error).is_some() {
                dom.remove(&error);
            }
        }
    });

    Ok(())
}
