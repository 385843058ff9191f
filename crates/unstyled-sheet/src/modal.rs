#![forbid(unsafe_code)]

//! Modal coordination: mounting, scrim, and dismissal around a sheet.
//!
//! A modal bottom sheet is a [`SheetState`] plus a surface that must exist
//! while any part of it is on screen. [`ModalCoordinator`] watches the sheet
//! and decides:
//!
//! - **mounting**: the surface mounts as soon as the sheet targets a
//!   visible detent, before the first animated frame;
//! - **scrim**: the scrim fades in while the sheet heads somewhere visible
//!   and fades out once it heads to hidden;
//! - **unmounting**: only after the sheet rests at hidden *and* the scrim
//!   has faded out;
//! - **dismissal**: `on_dismiss` runs once each time a shown sheet comes to
//!   rest at hidden, whatever moved it there. Dismissals are counted by the
//!   sheet ([`SheetState::hide_count`]), so an open-and-close that happens
//!   entirely between two syncs still dismisses.
//!
//! The coordinator never owns the sheet. Hosts pass it in each frame, which
//! also lets them swap in a recreated sheet with [`ModalCoordinator::attach_sheet`].
//!
//! # Example
//!
//! ```ignore
//! let mut modal = ModalCoordinator::new(&sheet).on_dismiss(|| close_route());
//! sheet.animate_to(&Detent::fully_expanded())?;
//! while modal.tick(frame_dt, &mut sheet) { render(&sheet, modal.scrim_opacity()); }
//! ```

use std::fmt;
use std::time::Duration;

use crate::scrim::{ScrimConfig, ScrimTransition};
use crate::sheet::SheetState;

/// Behavior switches for a modal sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalProperties {
    /// Tapping the scrim hides the sheet.
    pub dismiss_on_outside_tap: bool,
    /// The platform back action hides the sheet.
    pub dismiss_on_back_press: bool,
}

impl Default for ModalProperties {
    fn default() -> Self {
        Self {
            dismiss_on_outside_tap: true,
            dismiss_on_back_press: true,
        }
    }
}

impl ModalProperties {
    /// Set whether an outside tap dismisses.
    #[must_use]
    pub fn dismiss_on_outside_tap(mut self, dismiss: bool) -> Self {
        self.dismiss_on_outside_tap = dismiss;
        self
    }

    /// Set whether back press dismisses.
    #[must_use]
    pub fn dismiss_on_back_press(mut self, dismiss: bool) -> Self {
        self.dismiss_on_back_press = dismiss;
        self
    }
}

/// Snapshot of the sheet's visibility as last seen by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalVisibility {
    /// The committed detent is visible.
    pub current_visible: bool,
    /// The requested detent is visible.
    pub target_visible: bool,
    /// The sheet is at rest.
    pub idle: bool,
}

type DismissFn = dyn FnMut() + Send;

/// Mount, scrim, and dismiss bookkeeping for a modal sheet.
pub struct ModalCoordinator {
    properties: ModalProperties,
    scrim_config: ScrimConfig,
    scrim: ScrimTransition,
    mounted: bool,
    /// Sheet hide count as of the last sync.
    seen_hides: u64,
    visibility: ModalVisibility,
    on_dismiss: Option<Box<DismissFn>>,
    dismiss_count: u64,
}

impl fmt::Debug for ModalCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalCoordinator")
            .field("properties", &self.properties)
            .field("scrim", &self.scrim)
            .field("mounted", &self.mounted)
            .field("visibility", &self.visibility)
            .field("dismiss_count", &self.dismiss_count)
            .finish_non_exhaustive()
    }
}

impl ModalCoordinator {
    /// Coordinate `sheet` with default properties and scrim.
    ///
    /// A sheet already resting at a visible detent mounts immediately with
    /// the scrim fully shown.
    #[must_use]
    pub fn new(sheet: &SheetState) -> Self {
        let mut coordinator = Self {
            properties: ModalProperties::default(),
            scrim_config: ScrimConfig::default(),
            scrim: ScrimTransition::new(),
            mounted: false,
            seen_hides: 0,
            visibility: ModalVisibility::default(),
            on_dismiss: None,
            dismiss_count: 0,
        };
        coordinator.attach_sheet(sheet);
        coordinator
    }

    /// Set the modal properties.
    #[must_use]
    pub fn properties(mut self, properties: ModalProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Set the scrim fade configuration.
    #[must_use]
    pub fn scrim_config(mut self, config: ScrimConfig) -> Self {
        self.scrim_config = config;
        self
    }

    /// Honor a reduced-motion preference for the scrim.
    #[must_use]
    pub fn reduced_motion(mut self, enabled: bool) -> Self {
        self.scrim.set_reduced_motion(enabled);
        self
    }

    /// Callback run each time a shown sheet comes to rest at hidden.
    #[must_use]
    pub fn on_dismiss(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_dismiss = Some(Box::new(callback));
        self
    }

    /// Replace the dismiss callback.
    pub fn set_on_dismiss(&mut self, callback: impl FnMut() + Send + 'static) {
        self.on_dismiss = Some(Box::new(callback));
    }

    /// Resynchronize with a (possibly recreated) sheet without animating
    /// the scrim from scratch.
    ///
    /// A sheet resting visible shows the scrim at full opacity; a sheet
    /// resting hidden unmounts without a dismiss. A sheet mid-settle keeps
    /// the current scrim fade and reverses it if needed.
    pub fn attach_sheet(&mut self, sheet: &SheetState) {
        let target_visible = !sheet.target_detent().is_hidden();
        let current_visible = !sheet.current_detent().is_hidden();
        let idle = sheet.is_idle();
        self.seen_hides = sheet.hide_count();
        if target_visible {
            self.mount();
            if idle {
                self.scrim.force_visible();
            } else {
                self.scrim.start_entering();
            }
        } else if idle && !current_visible {
            self.scrim.force_hidden();
            self.unmount();
        } else {
            self.scrim.start_exiting();
        }
        self.visibility = ModalVisibility {
            current_visible,
            target_visible,
            idle,
        };
    }

    /// Observe `sheet` without advancing time: mount, steer the scrim,
    /// dismiss, and unmount as needed.
    pub fn sync(&mut self, sheet: &SheetState) {
        let target_visible = !sheet.target_detent().is_hidden();
        let current_visible = !sheet.current_detent().is_hidden();
        let idle = sheet.is_idle();
        self.visibility = ModalVisibility {
            current_visible,
            target_visible,
            idle,
        };

        let hides = sheet.hide_count();
        for _ in self.seen_hides..hides {
            self.dismiss();
        }
        self.seen_hides = hides;

        if target_visible {
            self.mount();
            self.scrim.start_entering();
            return;
        }

        self.scrim.start_exiting();
        if idle && !current_visible && self.scrim.is_hidden() {
            self.unmount();
        }
    }

    /// Advance the sheet and the scrim by `dt`.
    ///
    /// Returns `true` while either is still animating.
    pub fn tick(&mut self, dt: Duration, sheet: &mut SheetState) -> bool {
        self.sync(sheet);
        let sheet_running = sheet.tick(dt);
        self.scrim.tick(dt, &self.scrim_config);
        self.sync(sheet);
        sheet_running || !self.scrim.is_idle()
    }

    /// Handle a tap on the scrim. Returns whether it was consumed.
    pub fn on_outside_tap(&mut self, sheet: &mut SheetState) -> bool {
        if !self.properties.dismiss_on_outside_tap {
            return false;
        }
        self.request_hide(sheet)
    }

    /// Handle the platform back action. Returns whether it was consumed.
    pub fn on_back_press(&mut self, sheet: &mut SheetState) -> bool {
        if !self.properties.dismiss_on_back_press {
            return false;
        }
        self.request_hide(sheet)
    }

    fn request_hide(&mut self, sheet: &mut SheetState) -> bool {
        if !self.mounted {
            return false;
        }
        if sheet.target_detent().is_hidden() {
            return true;
        }
        let Some(hidden) = sheet.detents().hidden().cloned() else {
            return false;
        };
        let hid = sheet.set_current_detent(&hidden).is_ok();
        self.sync(sheet);
        hid
    }

    fn mount(&mut self) {
        if !self.mounted {
            self.mounted = true;
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "modal.mount");
        }
    }

    fn unmount(&mut self) {
        if self.mounted {
            self.mounted = false;
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "modal.unmount");
        }
    }

    fn dismiss(&mut self) {
        self.dismiss_count += 1;
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "modal.dismiss", count = self.dismiss_count);
        if let Some(callback) = self.on_dismiss.as_mut() {
            callback();
        }
    }

    /// Whether the modal surface should exist.
    #[inline]
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Scrim opacity to render.
    #[must_use]
    pub fn scrim_opacity(&self) -> f64 {
        self.scrim.opacity(&self.scrim_config)
    }

    /// Scrim transition state.
    #[inline]
    #[must_use]
    pub fn scrim(&self) -> &ScrimTransition {
        &self.scrim
    }

    /// Visibility as of the last sync.
    #[inline]
    #[must_use]
    pub fn visibility(&self) -> ModalVisibility {
        self.visibility
    }

    /// Number of dismissals so far.
    #[inline]
    #[must_use]
    pub fn dismiss_count(&self) -> u64 {
        self.dismiss_count
    }

    /// Modal properties in use.
    #[inline]
    #[must_use]
    pub fn modal_properties(&self) -> ModalProperties {
        self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detent::Detent;
    use crate::sheet::SheetConfig;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use unstyled_core::animation::{AnimationSpec, Easing};

    const MS_16: Duration = Duration::from_millis(16);

    fn sheet(initial: Detent) -> SheetState {
        let config = SheetConfig::new([Detent::hidden(), Detent::fully_expanded()], initial)
            .animation(AnimationSpec::tween(Duration::from_millis(160), Easing::Linear));
        let mut sheet = SheetState::new(config).unwrap();
        sheet.report_container_size(100.0);
        sheet.report_content_size(40.0);
        sheet
    }

    fn run(modal: &mut ModalCoordinator, sheet: &mut SheetState) {
        for _ in 0..200 {
            if !modal.tick(MS_16, sheet) {
                return;
            }
        }
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn hidden_sheet_starts_unmounted() {
        let sheet = sheet(Detent::hidden());
        let modal = ModalCoordinator::new(&sheet);
        assert!(!modal.is_mounted());
        assert_eq!(modal.scrim_opacity(), 0.0);
    }

    #[test]
    fn mounts_before_first_frame() {
        let mut sheet = sheet(Detent::hidden());
        let mut modal = ModalCoordinator::new(&sheet);
        sheet.animate_to(&Detent::fully_expanded()).unwrap();
        modal.sync(&sheet);
        assert!(modal.is_mounted());
        assert_eq!(sheet.offset(), 0.0, "no frame has run yet");
    }

    #[test]
    fn initial_visible_mount_has_full_scrim_and_no_dismiss() {
        let sheet = sheet(Detent::fully_expanded());
        let (count, callback) = counter();
        let mut modal = ModalCoordinator::new(&sheet).on_dismiss(callback);
        modal.sync(&sheet);
        assert!(modal.is_mounted());
        assert!(modal.scrim().is_visible());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unmounts_after_sheet_and_scrim_exit() {
        let mut sheet = sheet(Detent::fully_expanded());
        let (count, callback) = counter();
        let mut modal = ModalCoordinator::new(&sheet).on_dismiss(callback);
        sheet.set_current_detent(&Detent::hidden()).unwrap();
        modal.tick(MS_16, &mut sheet);
        assert!(modal.is_mounted());
        run(&mut modal, &mut sheet);
        assert!(!modal.is_mounted());
        assert!(modal.scrim().is_hidden());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn jump_to_hidden_dismisses_once() {
        let mut sheet = sheet(Detent::fully_expanded());
        let mut modal = ModalCoordinator::new(&sheet);
        sheet.jump_to(&Detent::hidden()).unwrap();
        modal.sync(&sheet);
        modal.sync(&sheet);
        run(&mut modal, &mut sheet);
        assert_eq!(modal.dismiss_count(), 1);
        assert!(!modal.is_mounted());
    }

    #[test]
    fn outside_tap_respects_properties() {
        let mut sheet = sheet(Detent::fully_expanded());
        let mut modal = ModalCoordinator::new(&sheet)
            .properties(ModalProperties::default().dismiss_on_outside_tap(false));
        assert!(!modal.on_outside_tap(&mut sheet));
        assert_eq!(sheet.target_detent(), &Detent::fully_expanded());

        assert!(modal.on_back_press(&mut sheet));
        assert_eq!(sheet.target_detent(), &Detent::hidden());
        run(&mut modal, &mut sheet);
        assert_eq!(modal.dismiss_count(), 1);
        assert!(!modal.on_back_press(&mut sheet), "unmounted");
    }

    #[test]
    fn attach_recreated_sheet_without_flash() {
        let old = sheet(Detent::hidden());
        let mut modal = ModalCoordinator::new(&old);
        let recreated = sheet(Detent::fully_expanded());
        modal.attach_sheet(&recreated);
        assert!(modal.is_mounted());
        assert!(modal.scrim().is_visible());
        assert_eq!(modal.dismiss_count(), 0);
    }

    #[test]
    fn reopening_mid_exit_reverses_scrim() {
        let mut sheet = sheet(Detent::fully_expanded());
        let mut modal = ModalCoordinator::new(&sheet).scrim_config(
            ScrimConfig::default()
                .exit_duration(Duration::from_millis(160))
                .exit_easing(Easing::Linear),
        );
        sheet.set_current_detent(&Detent::hidden()).unwrap();
        modal.tick(MS_16, &mut sheet);
        modal.tick(MS_16, &mut sheet);
        sheet.set_current_detent(&Detent::fully_expanded()).unwrap();
        modal.sync(&sheet);
        assert_eq!(modal.scrim().phase(), crate::scrim::ScrimPhase::Entering);
        run(&mut modal, &mut sheet);
        assert_eq!(modal.dismiss_count(), 0);
        assert!(modal.is_mounted());
        assert!(modal.visibility().idle);
    }
}
