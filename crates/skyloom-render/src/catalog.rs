use skyloom_core::{Environment, EnvironmentSnapshot, FrameSignals, SkyConfig, SkyboxEntry};

use crate::backend::RenderBackend;
use crate::decorations::DecorationCoordinator;
use crate::draw::DrawSkybox;
use crate::frame::{FrameContext, FrameOutput};

/// Stable handle to an entry for as long as it stays in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

#[derive(Debug)]
struct Slot {
    id: EntryId,
    entry: SkyboxEntry,
}

/// Owns every configured skybox and the frame-to-frame active set.
///
/// Reloadable entries come from configuration documents and are replaced on
/// every reload. Permanent entries are added in code and survive reloads.
#[derive(Debug)]
pub struct SkyboxCatalog {
    config: SkyConfig,
    reloadable: Vec<Slot>,
    permanent: Vec<Slot>,
    /// Entry order of the active working list.
    active: Vec<EntryId>,
    decorations: DecorationCoordinator,
    next_id: u64,
}

impl SkyboxCatalog {
    pub fn new(config: SkyConfig) -> Self {
        Self {
            config,
            reloadable: Vec::new(),
            permanent: Vec::new(),
            active: Vec::new(),
            decorations: DecorationCoordinator::new(),
            next_id: 0,
        }
    }

    pub fn config(&self) -> &SkyConfig {
        &self.config
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Entries must satisfy the document validator's rules; in particular
    /// `transition_speed` is positive, or a disqualified entry never fades.
    pub fn add_reloadable(&mut self, entry: SkyboxEntry) -> EntryId {
        debug_assert_transition_speed(&entry);
        let id = self.allocate_id();
        self.reloadable.push(Slot { id, entry });
        id
    }

    /// Same preconditions as [`SkyboxCatalog::add_reloadable`].
    pub fn add_permanent(&mut self, entry: SkyboxEntry) -> EntryId {
        debug_assert_transition_speed(&entry);
        let id = self.allocate_id();
        self.permanent.push(Slot { id, entry });
        id
    }

    /// Drop every reloadable entry, including from the active set.
    /// Permanent entries are untouched.
    pub fn clear_reloadable(&mut self) {
        let removed: Vec<EntryId> = self.reloadable.drain(..).map(|slot| slot.id).collect();
        self.active.retain(|id| !removed.contains(id));
    }

    /// Swap in a freshly decoded reload in one step, so no frame sees a
    /// half-populated catalog.
    pub fn replace_reloadable(&mut self, entries: Vec<SkyboxEntry>) -> Vec<EntryId> {
        self.clear_reloadable();
        let ids: Vec<EntryId> = entries
            .into_iter()
            .map(|entry| self.add_reloadable(entry))
            .collect();
        log::info!(
            "Reloaded {} skybox(es), {} permanent",
            ids.len(),
            self.permanent.len()
        );
        ids
    }

    pub fn len(&self) -> usize {
        self.reloadable.len() + self.permanent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.reloadable.iter().chain(self.permanent.iter())
    }

    /// Every entry, reloadable first.
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &SkyboxEntry)> {
        self.slots().map(|slot| (slot.id, &slot.entry))
    }

    pub fn get(&self, id: EntryId) -> Option<&SkyboxEntry> {
        self.slots()
            .find(|slot| slot.id == id)
            .map(|slot| &slot.entry)
    }

    pub fn active_ids(&self) -> &[EntryId] {
        &self.active
    }

    /// Sum of current alphas over all entries.
    pub fn total_alpha(&self) -> f32 {
        self.slots().map(|slot| slot.entry.alpha()).sum()
    }

    /// Step every entry's fade state machine once and collect the frame's
    /// fog and sky-tint requests.
    pub fn update_alphas(&mut self, env: Option<&EnvironmentSnapshot>) -> FrameSignals {
        let mut signals = FrameSignals::default();
        for slot in self.reloadable.iter_mut().chain(self.permanent.iter_mut()) {
            slot.entry.update_alpha(env, &self.config, &mut signals);
        }
        signals
    }

    /// Admit entries whose alpha reached the threshold. Entries already
    /// active are not re-checked here; see [`SkyboxCatalog::prune`].
    pub fn compute_active_set(&mut self) {
        let threshold = self.config.minimum_alpha;
        for slot in self.reloadable.iter().chain(self.permanent.iter()) {
            let alpha = slot.entry.alpha();
            // A fully transparent entry never enters, whatever the threshold.
            if alpha > 0.0 && alpha >= threshold && !self.active.contains(&slot.id) {
                self.active.push(slot.id);
            }
        }
    }

    /// Remove active entries whose alpha fell to the threshold or below.
    pub fn prune(&mut self) {
        let threshold = self.config.minimum_alpha;
        let (reloadable, permanent) = (&self.reloadable, &self.permanent);
        self.active.retain(|id| {
            reloadable
                .iter()
                .chain(permanent.iter())
                .find(|slot| slot.id == *id)
                .is_some_and(|slot| slot.entry.alpha() > threshold)
        });
    }

    /// One full frame: update alphas, decide whether the default sky is
    /// covered, draw the active set (decorations at most once) and prune.
    pub fn render_frame<E, B>(&mut self, env: &E, frame: &FrameContext, backend: &mut B) -> FrameOutput
    where
        E: Environment + ?Sized,
        B: RenderBackend + ?Sized,
    {
        let snapshot = EnvironmentSnapshot::capture(env);
        let signals = self.update_alphas(snapshot.as_ref());
        let total_alpha = self.total_alpha();
        let skip_default_sky = total_alpha > self.config.minimum_alpha;

        self.compute_active_set();
        self.decorations.begin_frame();
        let mut drawn = 0;
        for id in &self.active {
            let slot = self
                .reloadable
                .iter_mut()
                .chain(self.permanent.iter_mut())
                .find(|slot| slot.id == *id);
            if let Some(slot) = slot {
                slot.entry.draw(frame, &mut self.decorations, backend);
                drawn += 1;
            }
        }
        self.prune();

        FrameOutput {
            signals,
            skip_default_sky,
            total_alpha,
            drawn,
        }
    }
}

fn debug_assert_transition_speed(entry: &SkyboxEntry) {
    debug_assert!(
        entry.properties.transition_speed > 0.0,
        "skybox transition_speed must be positive, got {}",
        entry.properties.transition_speed
    );
}

impl Default for SkyboxCatalog {
    fn default() -> Self {
        Self::new(SkyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;
    use skyloom_core::{
        Blend, Fade, Identifier, Rgba, SkyboxKind, StaticEnvironment, Texture, Textures, Weather,
    };

    fn mono(fade: Fade, speed: f32) -> SkyboxEntry {
        let mut entry = SkyboxEntry::with_kind(SkyboxKind::MonoColor {
            color: Rgba::rgb(0.5, 0.5, 0.5),
        });
        entry.properties.fade = fade;
        entry.properties.transition_speed = speed;
        entry
    }

    fn textured(path: &str) -> SkyboxEntry {
        let mut entry = SkyboxEntry::with_kind(SkyboxKind::SquareTextured {
            blend: Blend::default(),
            textures: Textures::uniform(&Texture::new(Identifier::minecraft(path))),
        });
        entry.properties.fade = Fade::ALWAYS_ON;
        entry
    }

    fn day() -> FrameContext {
        FrameContext::from_day_time(6000, 0)
    }

    #[test]
    fn test_add_and_order() {
        let mut catalog = SkyboxCatalog::default();
        let p = catalog.add_permanent(mono(Fade::ALWAYS_ON, 1.0));
        let r = catalog.add_reloadable(mono(Fade::ALWAYS_ON, 1.0));
        let order: Vec<EntryId> = catalog.entries().map(|(id, _)| id).collect();
        assert_eq!(order, vec![r, p]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_clear_keeps_permanent_alpha() {
        let mut catalog = SkyboxCatalog::default();
        catalog.add_permanent(mono(Fade::ALWAYS_ON, 1.0));
        catalog.add_reloadable(mono(Fade::ALWAYS_ON, 1.0));
        catalog.add_reloadable(mono(Fade::ALWAYS_ON, 1.0));
        let env = StaticEnvironment::default().snapshot();
        catalog.update_alphas(env.as_ref());
        assert_eq!(catalog.total_alpha(), 3.0);

        catalog.clear_reloadable();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.total_alpha(), 1.0);
    }

    #[test]
    fn test_clear_removes_reloadable_from_active() {
        let mut catalog = SkyboxCatalog::default();
        let p = catalog.add_permanent(mono(Fade::ALWAYS_ON, 1.0));
        catalog.add_reloadable(mono(Fade::ALWAYS_ON, 1.0));
        let mut backend = RecordingBackend::new();
        catalog.render_frame(&StaticEnvironment::default(), &day(), &mut backend);
        assert_eq!(catalog.active_ids().len(), 2);

        catalog.clear_reloadable();
        assert_eq!(catalog.active_ids(), &[p]);
    }

    #[test]
    fn test_active_set_hysteresis() {
        let mut catalog = SkyboxCatalog::default();
        let mut entry = mono(Fade::new(0, 2000, 10000, 12000), 0.25);
        entry.conditions.weather = vec![Weather::Rain];
        let id = catalog.add_reloadable(entry);
        let mut backend = RecordingBackend::new();

        let rain = StaticEnvironment::default()
            .at_tick(5000)
            .with_weather(Weather::Rain);
        let out = catalog.render_frame(&rain, &day(), &mut backend);
        assert_eq!(out.drawn, 1);
        assert_eq!(catalog.active_ids(), &[id]);
        for _ in 0..3 {
            catalog.render_frame(&rain, &day(), &mut backend);
        }
        assert_eq!(catalog.get(id).map(SkyboxEntry::alpha), Some(1.0));

        // Disqualified: 0.75, 0.5, 0.25 stay active, 0.0 leaves
        let clear = rain.with_weather(Weather::Clear);
        for _ in 0..3 {
            catalog.render_frame(&clear, &day(), &mut backend);
            assert_eq!(catalog.active_ids(), &[id]);
        }
        let out = catalog.render_frame(&clear, &day(), &mut backend);
        assert_eq!(out.drawn, 1);
        assert!(catalog.active_ids().is_empty());
        assert_eq!(catalog.get(id).map(SkyboxEntry::alpha), Some(0.0));
    }

    #[test]
    fn test_entry_stays_active_while_above_threshold() {
        let mut catalog = SkyboxCatalog::default();
        let id = catalog.add_reloadable(mono(Fade::new(0, 2000, 10000, 12000), 0.5));
        let mut backend = RecordingBackend::new();
        let noon = StaticEnvironment::default().at_tick(5000);
        catalog.render_frame(&noon, &day(), &mut backend);
        catalog.render_frame(&noon, &day(), &mut backend);
        assert_eq!(catalog.get(id).map(SkyboxEntry::alpha), Some(1.0));

        // World unloads: alpha steps 1.0 -> 0.5 -> 0.0
        let unloaded = StaticEnvironment::unloaded();
        catalog.render_frame(&unloaded, &day(), &mut backend);
        assert!(catalog.active_ids().contains(&id));
        catalog.render_frame(&unloaded, &day(), &mut backend);
        assert!(catalog.active_ids().is_empty());
    }

    #[test]
    fn test_skip_default_sky() {
        let mut catalog = SkyboxCatalog::default();
        catalog.add_reloadable(mono(Fade::new(0, 2000, 10000, 12000), 1.0));
        let mut backend = RecordingBackend::new();

        let night = catalog.render_frame(&StaticEnvironment::default().at_tick(18000), &day(), &mut backend);
        assert!(!night.skip_default_sky);
        assert_eq!(night.drawn, 0);

        let noon = catalog.render_frame(&StaticEnvironment::default().at_tick(6000), &day(), &mut backend);
        assert!(noon.skip_default_sky);
        assert_eq!(noon.total_alpha, 1.0);
    }

    #[test]
    fn test_decorations_drawn_once_per_frame() {
        let mut catalog = SkyboxCatalog::default();
        catalog.add_reloadable(textured("a.png"));
        catalog.add_reloadable(textured("b.png"));
        catalog.add_permanent(textured("c.png"));
        let mut backend = RecordingBackend::new();

        for _ in 0..3 {
            backend.clear();
            let out = catalog.render_frame(&StaticEnvironment::default(), &day(), &mut backend);
            assert_eq!(out.drawn, 3);
            let textures = backend.textures_drawn();
            let sun = Identifier::minecraft(skyloom_core::constants::DEFAULT_SUN_TEXTURE);
            assert_eq!(textures.iter().filter(|t| ***t == sun).count(), 1);
            assert_eq!(textures.len(), 3 * 6 + 2);
        }
    }

    #[test]
    fn test_signals_collected_each_frame() {
        let mut catalog = SkyboxCatalog::default();
        let mut foggy = mono(Fade::ALWAYS_ON, 1.0);
        foggy.properties.change_fog = true;
        foggy.properties.fog_color = Rgba::rgb(0.9, 0.1, 0.1);
        catalog.add_reloadable(foggy);
        let mut backend = RecordingBackend::new();

        let out = catalog.render_frame(&StaticEnvironment::default(), &day(), &mut backend);
        assert_eq!(out.signals.fog_override, Some(Rgba::rgb(0.9, 0.1, 0.1)));

        catalog.clear_reloadable();
        let out = catalog.render_frame(&StaticEnvironment::default(), &day(), &mut backend);
        assert_eq!(out.signals, FrameSignals::default());
        assert!(!out.skip_default_sky);
    }

    #[test]
    fn test_transparent_entry_never_takes_decorations() {
        let config = SkyConfig {
            minimum_alpha: 0.0,
            ..SkyConfig::default()
        };
        let mut catalog = SkyboxCatalog::new(config);
        let mut hidden = textured("hidden.png");
        hidden.properties.fade = Fade::new(0, 2000, 10000, 12000);
        let hidden = catalog.add_reloadable(hidden);
        let visible = catalog.add_reloadable(textured("visible.png"));
        let mut backend = RecordingBackend::new();

        let night = StaticEnvironment::default().at_tick(18000);
        let out = catalog.render_frame(&night, &day(), &mut backend);
        assert_eq!(catalog.get(hidden).map(SkyboxEntry::alpha), Some(0.0));
        assert_eq!(out.drawn, 1);
        assert_eq!(catalog.active_ids(), &[visible]);
        // Decorations were drawn by the visible entry, at its alpha.
        assert!(!backend.commands.iter().any(|c| matches!(
            c,
            crate::backend::DrawCommand::SetShaderTint(tint) if tint.alpha == 0.0
        )));
        assert_eq!(backend.textures_drawn().len(), 6 + 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "transition_speed must be positive")]
    fn test_rejects_non_positive_transition_speed() {
        let mut catalog = SkyboxCatalog::default();
        catalog.add_permanent(mono(Fade::ALWAYS_ON, -0.5));
    }

    #[test]
    fn test_active_order_reloadable_then_permanent() {
        let mut catalog = SkyboxCatalog::default();
        let p = catalog.add_permanent(mono(Fade::ALWAYS_ON, 1.0));
        let r1 = catalog.add_reloadable(mono(Fade::ALWAYS_ON, 1.0));
        let r2 = catalog.add_reloadable(mono(Fade::ALWAYS_ON, 1.0));
        catalog.update_alphas(StaticEnvironment::default().snapshot().as_ref());
        catalog.compute_active_set();
        assert_eq!(catalog.active_ids(), &[r1, r2, p]);
    }
}
