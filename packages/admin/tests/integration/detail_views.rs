use admin::detail::user::JudgeInfoLines;
use admin::detail::{CriteriaDetail, RoundDetail, UserDetail};
use common::{CriteriaId, CriteriaRef, JudgeInfo, Role};

use crate::common::{criteria, judge, round};

mod criteria_view {
    use super::*;

    #[test]
    fn shows_weight_usage_and_creator() {
        let detail = CriteriaDetail::from(&criteria("c1", "Innovation"));
        assert_eq!(detail.weight, "25%");
        assert_eq!(detail.status, "Active");
        assert_eq!(detail.usage, "Used in 2 rounds");
        assert_eq!(detail.created_at, "Feb 1, 2024 10:00");
        assert_eq!(detail.updated_at, "Feb 3, 2024 16:45");
        assert_eq!(detail.created_by, "admin");
    }

    #[test]
    fn single_use_and_inactive() {
        let mut c = criteria("c1", "Innovation");
        c.usage_count = 1;
        c.is_active = false;
        c.created_by = None;
        c.updated_at = None;
        let detail = CriteriaDetail::from(&c);
        assert_eq!(detail.usage, "Used in 1 round");
        assert_eq!(detail.status, "Inactive");
        assert_eq!(detail.created_by, "Unknown");
        assert_eq!(detail.updated_at, "N/A");
    }

    #[test]
    fn display_lists_every_field() {
        let text = CriteriaDetail::from(&criteria("c1", "Innovation")).to_string();
        assert!(text.starts_with("Innovation [Active]"));
        assert!(text.contains("Weight:     25%"));
        assert!(text.contains("Award full marks when the work is exemplary"));
        assert!(text.contains("by admin"));
    }
}

mod round_view {
    use super::*;

    #[test]
    fn shows_badges_progress_and_criteria_names() {
        let r = round(
            "r1",
            vec![
                CriteriaRef::Populated(Box::new(criteria("c1", "Innovation"))),
                CriteriaRef::Id(CriteriaId::new("c9")),
            ],
        );
        let detail = RoundDetail::from(&r);
        assert_eq!(detail.status, "Active");
        assert_eq!(detail.availability, "Closed");
        assert_eq!(detail.completion, "40%");
        assert_eq!(detail.progress_width, "40%");
        assert_eq!(detail.criteria, vec!["Innovation", "c9"]);
        assert_eq!(detail.starts, "May 1, 2024 09:00");
        assert_eq!(detail.ends, "May 3, 2024 17:30");
        assert_eq!(detail.total_teams, 12);
        assert_eq!(detail.completed_evaluations, 15);
    }

    #[test]
    fn progress_bar_is_clamped() {
        let mut r = round("r1", vec![]);
        r.completion_percentage = 140.0;
        assert_eq!(RoundDetail::from(&r).progress_width, "100%");
        r.completion_percentage = -3.0;
        assert_eq!(RoundDetail::from(&r).progress_width, "0%");
        r.completion_percentage = f64::NAN;
        let detail = RoundDetail::from(&r);
        assert_eq!(detail.progress_width, "0%");
        assert_eq!(detail.completion, "0%");
    }

    #[test]
    fn blank_description_is_hidden() {
        let mut r = round("r1", vec![]);
        r.description = Some("   ".into());
        r.is_open = true;
        let detail = RoundDetail::from(&r);
        assert_eq!(detail.description, None);
        assert_eq!(detail.availability, "Open");

        let text = detail.to_string();
        assert!(text.starts_with("Semi-finals [Active] [Open]\n\n"));
        assert!(text.ends_with("Criteria (0):"));
    }
}

mod user_view {
    use super::*;

    #[test]
    fn judge_without_info_shows_placeholders() {
        let detail = UserDetail::from(&judge("u1"));
        assert_eq!(detail.role, "Judge");
        assert_eq!(detail.last_login, "Never");
        assert_eq!(detail.created_by, "Unknown");
        assert_eq!(
            detail.judge_info,
            Some(JudgeInfoLines {
                company: "N/A".into(),
                position: "N/A".into(),
                experience: "N/A".into(),
            })
        );
    }

    #[test]
    fn judge_info_is_shown_for_judges() {
        let mut user = judge("u1");
        user.judge_info = Some(JudgeInfo {
            company: Some("Acme Labs".into()),
            position: Some("CTO".into()),
            experience: Some(" ".into()),
        });
        let detail = UserDetail::from(&user);
        let info = detail.judge_info.as_ref().unwrap();
        assert_eq!(info.company, "Acme Labs");
        assert_eq!(info.position, "CTO");
        assert_eq!(info.experience, "N/A");
        assert!(detail.to_string().contains("Company:    Acme Labs"));
    }

    #[test]
    fn admins_never_show_judge_info() {
        let mut user = judge("u1");
        user.role = Role::Admin;
        user.judge_info = Some(JudgeInfo {
            company: Some("Acme Labs".into()),
            ..Default::default()
        });
        let detail = UserDetail::from(&user);
        assert_eq!(detail.role, "Administrator");
        assert_eq!(detail.judge_info, None);
        assert!(!detail.to_string().contains("Company"));
    }
}
