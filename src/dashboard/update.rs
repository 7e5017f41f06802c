//! Pure reducer for the dashboard state machine.
//!
//! `update()` mutates the state and lists the page work the message implies.
//! Nothing here touches the page.

use super::model::{DashboardMsg, DashboardState, Effect};
use crate::report::payload::Period;

/// Apply `msg` to `state`, returning the effects to render.
pub fn update(state: &mut DashboardState, msg: DashboardMsg) -> Vec<Effect> {
    match msg {
        DashboardMsg::SelectTab(tab) => {
            state.active_tab = tab;
            vec![Effect::ShowTab(tab)]
        }

        DashboardMsg::ToggleDropdown => {
            state.dropdown_open = !state.dropdown_open;
            if state.dropdown_open {
                state.pending_period = state.period;
                vec![Effect::SyncDropdown, Effect::SyncPeriodLabel]
            } else {
                vec![Effect::SyncDropdown]
            }
        }

        DashboardMsg::ClickOutside => {
            if state.dropdown_open {
                state.dropdown_open = false;
                vec![Effect::SyncDropdown]
            } else {
                Vec::new()
            }
        }

        DashboardMsg::SelectPeriod(period) => move_pending(state, period),
        DashboardMsg::PreviousMonth => {
            let target = state.pending_period.previous();
            move_pending(state, target)
        }
        DashboardMsg::NextMonth => {
            let target = state.pending_period.next();
            move_pending(state, target)
        }

        DashboardMsg::ConfirmNavigation => {
            if !state.dropdown_open {
                return Vec::new();
            }
            state.dropdown_open = false;
            vec![
                Effect::SyncDropdown,
                Effect::Navigate {
                    path: state.pending_period.report_path(),
                },
            ]
        }

        DashboardMsg::Navigate { year, month } => match Period::new(year, month) {
            Ok(target) => {
                state.pending_period = target;
                let mut effects = Vec::with_capacity(2);
                if state.dropdown_open {
                    state.dropdown_open = false;
                    effects.push(Effect::SyncDropdown);
                }
                effects.push(Effect::Navigate {
                    path: target.report_path(),
                });
                effects
            }
            Err(err) => vec![Effect::Rejected {
                reason: err.to_string(),
            }],
        },

        DashboardMsg::Resize { .. } => {
            if state.cloud_retry_pending.is_some() {
                // The pending retry lays out at the new width.
                Vec::new()
            } else {
                vec![Effect::RenderCloud { attempt: 1 }]
            }
        }

        DashboardMsg::CloudRetry { attempt } => {
            if state.cloud_retry_pending == Some(attempt) {
                state.cloud_retry_pending = None;
                vec![Effect::RenderCloud { attempt }]
            } else {
                Vec::new()
            }
        }
    }
}

fn move_pending(state: &mut DashboardState, target: Period) -> Vec<Effect> {
    if !state.dropdown_open || state.pending_period == target {
        return Vec::new();
    }
    state.pending_period = target;
    vec![Effect::SyncPeriodLabel]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::model::Tab;

    fn state() -> DashboardState {
        DashboardState::new(true, Period::new(2024, 5).expect("valid"))
    }

    #[test]
    fn toggle_opens_then_click_outside_closes() {
        let mut s = state();
        update(&mut s, DashboardMsg::ToggleDropdown);
        assert!(s.dropdown_open);
        assert_eq!(update(&mut s, DashboardMsg::ClickOutside), vec![Effect::SyncDropdown]);
        assert!(!s.dropdown_open);
    }

    #[test]
    fn toggle_twice_closes() {
        let mut s = state();
        update(&mut s, DashboardMsg::ToggleDropdown);
        update(&mut s, DashboardMsg::ToggleDropdown);
        assert!(!s.dropdown_open);
    }

    #[test]
    fn click_outside_when_closed_is_noop() {
        let mut s = state();
        let before = s.clone();
        assert!(update(&mut s, DashboardMsg::ClickOutside).is_empty());
        assert_eq!(s, before);
    }

    #[test]
    fn select_tab_sets_active_tab() {
        let mut s = state();
        let effects = update(&mut s, DashboardMsg::SelectTab(Tab::Emotion));
        assert_eq!(s.active_tab, Tab::Emotion);
        assert_eq!(effects, vec![Effect::ShowTab(Tab::Emotion)]);
    }

    #[test]
    fn confirm_navigates_to_pending_period() {
        let mut s = state();
        update(&mut s, DashboardMsg::ToggleDropdown);
        update(&mut s, DashboardMsg::PreviousMonth);
        update(&mut s, DashboardMsg::PreviousMonth);
        let effects = update(&mut s, DashboardMsg::ConfirmNavigation);
        assert!(!s.dropdown_open);
        assert_eq!(
            effects.last(),
            Some(&Effect::Navigate {
                path: "/report/202403/".into()
            })
        );
        assert_eq!(s.period, Period::new(2024, 5).expect("valid"));
    }

    #[test]
    fn confirm_without_open_dropdown_does_nothing() {
        let mut s = state();
        assert!(update(&mut s, DashboardMsg::ConfirmNavigation).is_empty());
    }

    #[test]
    fn period_moves_require_open_dropdown() {
        let mut s = state();
        assert!(update(&mut s, DashboardMsg::NextMonth).is_empty());
        assert_eq!(s.pending_period, s.period);
    }

    #[test]
    fn reopening_resets_pending_period() {
        let mut s = state();
        update(&mut s, DashboardMsg::ToggleDropdown);
        update(&mut s, DashboardMsg::NextMonth);
        update(&mut s, DashboardMsg::ToggleDropdown);
        update(&mut s, DashboardMsg::ToggleDropdown);
        assert_eq!(s.pending_period, s.period);
    }

    #[test]
    fn direct_navigate_builds_padded_path() {
        let mut s = state();
        let effects = update(&mut s, DashboardMsg::Navigate { year: 2023, month: 1 });
        assert_eq!(
            effects,
            vec![Effect::Navigate {
                path: "/report/202301/".into()
            }]
        );
    }

    #[test]
    fn invalid_navigate_is_rejected() {
        let mut s = state();
        let before = s.clone();
        let effects = update(&mut s, DashboardMsg::Navigate { year: 2023, month: 13 });
        assert!(matches!(effects.as_slice(), [Effect::Rejected { .. }]));
        assert_eq!(s, before);
    }

    #[test]
    fn stale_cloud_retry_is_ignored() {
        let mut s = state();
        s.cloud_retry_pending = Some(3);
        assert!(update(&mut s, DashboardMsg::CloudRetry { attempt: 2 }).is_empty());
        assert!(update(&mut s, DashboardMsg::Resize { width: 320.0 }).is_empty());
        assert_eq!(
            update(&mut s, DashboardMsg::CloudRetry { attempt: 3 }),
            vec![Effect::RenderCloud { attempt: 3 }]
        );
        assert_eq!(s.cloud_retry_pending, None);
    }
}
