use crate::device::GraphicsContext;
use crate::stage::BoxedStage;

/// Supplies overlay stages; slice order is draw order.
pub trait OverlayProvider<C: GraphicsContext> {
    fn overlays(&mut self) -> &mut [BoxedStage<C>];
}

/// Ordered overlay list: stages draw in the order they were added.
pub struct OverlayRegistry<C: GraphicsContext> {
    stages: Vec<BoxedStage<C>>,
}

impl<C: GraphicsContext> OverlayRegistry<C> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Appends `stage`; it draws on top of every stage added before it.
    pub fn add(&mut self, stage: BoxedStage<C>) {
        log::debug!("overlay `{}` registered at position {}", stage.label(), self.stages.len());
        self.stages.push(stage);
    }

    /// Removes the first stage labelled `label`, keeping the order of the rest.
    pub fn remove(&mut self, label: &str) -> Option<BoxedStage<C>> {
        let pos = self.stages.iter().position(|s| s.label() == label)?;
        Some(self.stages.remove(pos))
    }

    pub fn clear(&mut self) {
        self.stages.clear();
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|s| s.label())
    }
}

impl<C: GraphicsContext> Default for OverlayRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: GraphicsContext> OverlayProvider<C> for OverlayRegistry<C> {
    fn overlays(&mut self) -> &mut [BoxedStage<C>] {
        &mut self.stages
    }
}

impl<C: GraphicsContext> std::fmt::Debug for OverlayRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeStage, Journal, RecordingContext};

    fn registry(names: &[&'static str]) -> OverlayRegistry<RecordingContext> {
        let journal = Journal::default();
        let mut reg = OverlayRegistry::new();
        for name in names {
            reg.add(Box::new(FakeStage::new(*name, &journal)));
        }
        reg
    }

    #[test]
    fn insertion_order_is_draw_order() {
        let mut reg = registry(&["hotspot", "reticle", "menu"]);
        let labels: Vec<_> = reg.overlays().iter().map(|s| s.label().to_string()).collect();
        assert_eq!(labels, ["hotspot", "reticle", "menu"]);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut reg = registry(&["hotspot", "reticle", "menu"]);
        assert!(reg.remove("reticle").is_some());
        assert!(reg.remove("missing").is_none());
        assert_eq!(reg.labels().collect::<Vec<_>>(), ["hotspot", "menu"]);
        reg.clear();
        assert!(reg.is_empty());
    }
}
