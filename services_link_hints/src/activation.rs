//! Candidate activation
//!
//! Each element kind maps to exactly one activation through a fixed table.

use crate::session::Candidate;
use page_api::{PageApi, PageError};
use page_types::ElementKind;
use serde::{Deserialize, Serialize};

/// What activating a candidate does to its element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationMethod {
    /// Simulated click
    Click,
    /// Move keyboard focus (no click, no submit)
    Focus,
}

const ACTIVATION_TABLE: [(ElementKind, ActivationMethod); 3] = [
    (ElementKind::Link, ActivationMethod::Click),
    (ElementKind::Button, ActivationMethod::Click),
    (ElementKind::Input, ActivationMethod::Focus),
];

impl ActivationMethod {
    pub fn for_kind(kind: ElementKind) -> Self {
        ACTIVATION_TABLE
            .iter()
            .find(|(entry, _)| *entry == kind)
            .map(|(_, method)| *method)
            .unwrap_or(ActivationMethod::Click)
    }
}

/// Activates a candidate's element.
///
/// Liveness is checked first; a detached target yields
/// [`PageError::StaleElement`] and nothing is invoked.
pub fn activate<P: PageApi + ?Sized>(
    page: &mut P,
    candidate: &Candidate,
) -> Result<ActivationMethod, PageError> {
    if !page.is_attached(candidate.target) {
        return Err(PageError::StaleElement(candidate.target));
    }

    let method = ActivationMethod::for_kind(candidate.kind);
    match method {
        ActivationMethod::Click => page.click(candidate.target)?,
        ActivationMethod::Focus => page.focus(candidate.target)?,
    }
    Ok(method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::HintAlphabet;
    use page_types::{BadgeId, Rect, Viewport};
    use sim_page::{Activation, ElementSpec, SimulatedPage};

    fn candidate(target: page_types::ElementId, kind: ElementKind) -> Candidate {
        let code = HintAlphabet::new("a", &[]).unwrap().generate_codes(1).remove(0);
        Candidate {
            target,
            kind,
            code,
            badge: BadgeId::new(),
        }
    }

    #[test]
    fn test_activation_table() {
        assert_eq!(ActivationMethod::for_kind(ElementKind::Link), ActivationMethod::Click);
        assert_eq!(ActivationMethod::for_kind(ElementKind::Button), ActivationMethod::Click);
        assert_eq!(ActivationMethod::for_kind(ElementKind::Input), ActivationMethod::Focus);
    }

    #[test]
    fn test_activate_input_focuses() {
        let mut page = SimulatedPage::new(Viewport::new(800.0, 600.0));
        let input = page.add_element(ElementSpec::text_input(Rect::new(0.0, 0.0, 50.0, 20.0)));

        let method = activate(&mut page, &candidate(input, ElementKind::Input)).unwrap();

        assert_eq!(method, ActivationMethod::Focus);
        assert_eq!(page.activations(), &[Activation::Focused(input)]);
    }

    #[test]
    fn test_activate_stale_target_does_nothing() {
        let mut page = SimulatedPage::new(Viewport::new(800.0, 600.0));
        let link = page.add_element(ElementSpec::link(Rect::new(0.0, 0.0, 50.0, 20.0)));
        page.detach(link);

        let result = activate(&mut page, &candidate(link, ElementKind::Link));

        assert_eq!(result, Err(PageError::StaleElement(link)));
        assert!(page.activations().is_empty());
    }
}
