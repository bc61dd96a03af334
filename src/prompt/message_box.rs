use super::{ConfirmPrompt, PromptAnswer, WARNING_TEXT, WARNING_TITLE};
use windows::core::HSTRING;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    MessageBoxW, IDYES, MB_DEFBUTTON2, MB_ICONINFORMATION, MB_ICONWARNING, MB_OK, MB_YESNO,
};

/// Owner-less modal Yes/No box; "No" is the default button.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageBoxPrompt;

impl ConfirmPrompt for MessageBoxPrompt {
    fn ask(&self) -> PromptAnswer {
        // SAFETY: both strings outlive the call and no owner window is passed.
        let answer = unsafe {
            MessageBoxW(
                HWND::default(),
                &HSTRING::from(WARNING_TEXT),
                &HSTRING::from(WARNING_TITLE),
                MB_ICONWARNING | MB_YESNO | MB_DEFBUTTON2,
            )
        };
        if answer == IDYES {
            PromptAnswer::Affirm
        } else {
            PromptAnswer::Decline
        }
    }
}

pub(super) fn show_notice(title: &str, text: &str) {
    // SAFETY: see above.
    unsafe {
        MessageBoxW(
            HWND::default(),
            &HSTRING::from(text),
            &HSTRING::from(title),
            MB_ICONINFORMATION | MB_OK,
        );
    }
}
