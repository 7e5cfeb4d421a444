use eframe::egui;

pub fn render(ui: &mut egui::Ui, draft: &mut String, highlighted: bool) -> bool {
    let mut send = false;
    ui.horizontal(|ui| {
        let mut editor = egui::TextEdit::multiline(draft)
            .desired_rows(2)
            .hint_text("Enter to send, Shift+Enter for a new line");
        if highlighted {
            editor = editor.text_color(egui::Color32::RED);
        }
        ui.add(editor);

        if ui.button("Send").clicked() {
            send = true;
        }
    });
    send
}

/// Enter (không giữ Shift) gửi tin; tiêu thụ phím để ô soạn thảo không chèn dòng mới.
pub fn take_enter_press(ctx: &egui::Context) -> bool {
    ctx.input_mut(|input| {
        let pressed = input.key_pressed(egui::Key::Enter) && !input.modifiers.shift;
        if pressed {
            input.events.retain(|event| {
                !matches!(
                    event,
                    egui::Event::Key {
                        key: egui::Key::Enter,
                        pressed: true,
                        ..
                    }
                )
            });
        }
        pressed
    })
}
