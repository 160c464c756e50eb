use crate::context::LayoutContext;
use crate::highlight::{
    HighlightListener, HighlightResolver, HighlightState, HoverTarget, NoopListener,
};
use crate::scene::{ChordScene, build_scene};
use crate::text::TextStyle;
use crate::theme::ChordTheme;
use crate::{LayoutOptions, Result};
use chordal_core::{ChordConfig, Direction, FlowTable, IsolatedEntities, SubgroupOrder, ZoneKey};
use serde_json::Value;

/// One interactive directed chord diagram.
///
/// Owns the configuration, the current [`LayoutContext`] and the hover state. Supplying new data
/// or changing geometry rebuilds the context and clears any active highlight in the same call,
/// so the hover state never points into a discarded layout.
pub struct ChordDiagram<L: HighlightListener = NoopListener> {
    config: ChordConfig,
    options: LayoutOptions,
    id: Option<String>,
    table: FlowTable,
    context: LayoutContext,
    theme: ChordTheme,
    highlight: HighlightResolver,
    listener: L,
}

impl ChordDiagram<NoopListener> {
    pub fn new(config: ChordConfig, options: LayoutOptions) -> Result<Self> {
        Self::with_listener(config, options, NoopListener)
    }
}

impl<L: HighlightListener> ChordDiagram<L> {
    pub fn with_listener(config: ChordConfig, options: LayoutOptions, listener: L) -> Result<Self> {
        config.validate()?;
        let table = FlowTable::default();
        let context =
            LayoutContext::build(table.clone(), &config, options.text_measurer.as_ref(), None)?;
        let theme = ChordTheme::from_config(&config);
        Ok(Self {
            config,
            options,
            id: None,
            table,
            context,
            theme,
            highlight: HighlightResolver::new(),
            listener,
        })
    }

    /// Namespaces generated ids (label guide circles) for pages hosting several diagrams.
    pub fn with_id(mut self, id: impl Into<String>) -> Result<Self> {
        self.id = Some(id.into());
        self.relayout()?;
        Ok(self)
    }

    pub fn config(&self) -> &ChordConfig {
        &self.config
    }

    pub fn context(&self) -> &LayoutContext {
        &self.context
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn highlight_state(&self) -> &HighlightState {
        self.highlight.state()
    }

    pub fn set_data(&mut self, table: FlowTable) -> Result<()> {
        self.table = table;
        self.relayout()
    }

    pub fn set_records(&mut self, records: &[Value]) -> Result<()> {
        let table = FlowTable::from_records(records, &self.config.name_key)?;
        self.set_data(table)
    }

    /// Replaces the whole configuration and returns the previous one.
    /// A config that fails validation is rejected and the current one kept.
    pub fn set_config(&mut self, config: ChordConfig) -> Result<ChordConfig> {
        config.validate()?;
        let old = std::mem::replace(&mut self.config, config);
        self.theme = ChordTheme::from_config(&self.config);
        self.relayout()?;
        Ok(old)
    }

    pub fn set_width(&mut self, width: f64) -> Result<f64> {
        self.reconfigure(|c| c.set_width(width))
    }

    pub fn set_height(&mut self, height: f64) -> Result<f64> {
        self.reconfigure(|c| c.set_height(height))
    }

    pub fn set_pad_angle(&mut self, pad_angle: f64) -> Result<f64> {
        self.reconfigure(|c| c.set_pad_angle(pad_angle))
    }

    pub fn set_node_thickness(&mut self, thickness: f64) -> Result<f64> {
        self.reconfigure(|c| c.set_node_thickness(thickness))
    }

    pub fn set_zone_thickness(&mut self, thickness: f64) -> Result<f64> {
        self.reconfigure(|c| c.set_zone_thickness(thickness))
    }

    pub fn set_isolated_entities(&mut self, policy: IsolatedEntities) -> Result<IsolatedEntities> {
        self.reconfigure(|c| c.set_isolated_entities(policy))
    }

    pub fn set_subgroup_order(&mut self, order: SubgroupOrder) -> Result<SubgroupOrder> {
        self.reconfigure(|c| c.set_subgroup_order(order))
    }

    /// Colors only affect paint, so the layout and hover state are kept.
    pub fn set_primary_color(&mut self, color: impl Into<String>) -> String {
        let old = self.config.set_primary_color(color);
        self.theme = ChordTheme::from_config(&self.config);
        old
    }

    pub fn set_secondary_color(&mut self, color: impl Into<String>) -> String {
        let old = self.config.set_secondary_color(color);
        self.theme = ChordTheme::from_config(&self.config);
        old
    }

    /// Applies `change` to a copy of the config and relayouts only if the result validates.
    fn reconfigure<T>(&mut self, change: impl FnOnce(&mut ChordConfig) -> T) -> Result<T> {
        let mut next = self.config.clone();
        let old = change(&mut next);
        next.validate()?;
        self.config = next;
        self.relayout()?;
        Ok(old)
    }

    fn relayout(&mut self) -> Result<()> {
        self.highlight.exit(&mut self.listener);
        self.context = LayoutContext::build(
            self.table.clone(),
            &self.config,
            self.options.text_measurer.as_ref(),
            self.id.as_deref(),
        )?;
        Ok(())
    }

    pub fn hover(&mut self, target: HoverTarget) -> bool {
        self.highlight
            .enter(&self.context, target, &mut self.listener)
    }

    pub fn hover_node(&mut self, name: &str) -> bool {
        match self.context.entity_index(name) {
            Some(entity) => self.hover(HoverTarget::Node(entity)),
            None => self.hover_stale(),
        }
    }

    pub fn hover_zone(&mut self, name: &str, direction: Direction) -> bool {
        match self.context.entity_index(name) {
            Some(entity) => self.hover(HoverTarget::Zone(ZoneKey { entity, direction })),
            None => self.hover_stale(),
        }
    }

    pub fn hover_chord(&mut self, source: &str, target: &str) -> bool {
        let chord = self
            .context
            .entity_index(source)
            .zip(self.context.entity_index(target))
            .and_then(|(s, t)| self.context.chord_between(s, t));
        match chord {
            Some(index) => self.hover(HoverTarget::Chord(index)),
            None => self.hover_stale(),
        }
    }

    fn hover_stale(&mut self) -> bool {
        tracing::trace!("hover by name did not match the current layout; clearing");
        self.highlight.exit(&mut self.listener);
        false
    }

    pub fn hover_exit(&mut self) {
        self.highlight.exit(&mut self.listener);
    }

    pub fn scene(&self) -> ChordScene {
        build_scene(
            &self.context,
            self.highlight.state(),
            &self.theme,
            self.config.width,
            self.config.height,
            &TextStyle::from(&self.config.label_font),
        )
    }
}
