/// Static links and channel references shown under the checklist.
///
/// Compiled in at process start; there is no runtime mutation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resources {
    pub handbook_url: &'static str,
    pub brand_center_url: &'static str,
    pub pd_recordings_url: &'static str,
    pub staff_directory_url: &'static str,
    pub all_team_channel: &'static str,
    pub announcements_channel: &'static str,
    pub admin_email: &'static str,
}
