use crate::models::CalendarResponse;

pub fn render_index(calendar: &CalendarResponse) -> String {
    let initial = serde_json::to_string(calendar)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");
    INDEX_HTML
        .replace("{{TITLE}}", &format!("{} {}", calendar.month_name, calendar.year))
        .replace("{{INITIAL}}", &initial)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Activity Calendar</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --muted: #8b857d;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --logged: #d8f3e3;
      --logged-ink: #1f6f4a;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.8rem, 4vw, 2.5rem);
      margin: 0;
    }

    .month-bar {
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    .month-bar h2 {
      margin: 0;
      font-size: 1.2rem;
      color: var(--accent-2);
    }

    button {
      appearance: none;
      border: 1px solid rgba(47, 72, 88, 0.15);
      background: white;
      color: var(--ink);
      border-radius: 999px;
      padding: 8px 16px;
      font: inherit;
      font-weight: 500;
      cursor: pointer;
      transition: transform 150ms ease, box-shadow 150ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    button.primary {
      background: var(--accent-2);
      border-color: var(--accent-2);
      color: white;
    }

    button.danger {
      border: none;
      background: none;
      color: var(--accent);
      text-decoration: underline;
    }

    .weekdays,
    .grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
    }

    .weekdays div {
      text-align: center;
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .cell {
      aspect-ratio: 1;
      border-radius: 14px;
      padding: 8px;
      text-align: left;
      display: flex;
      flex-direction: column;
      gap: 6px;
      background: #fbf8f2;
    }

    .cell:disabled {
      opacity: 0.45;
      cursor: default;
      background: white;
    }

    .cell .day {
      font-size: 0.8rem;
      color: var(--muted);
    }

    .cell .label {
      font-size: 0.75rem;
      border-radius: 8px;
      padding: 2px 6px;
      background: var(--logged);
      color: var(--logged-ink);
      overflow: hidden;
      text-overflow: ellipsis;
      white-space: nowrap;
    }

    .hint {
      margin: 0;
      font-size: 0.85rem;
      color: var(--muted);
    }

    .status {
      min-height: 1.2em;
      font-size: 0.9rem;
    }

    .status.ok {
      color: var(--logged-ink);
    }

    .status.error {
      color: var(--accent);
    }

    dialog {
      border: none;
      border-radius: 22px;
      box-shadow: var(--shadow);
      width: min(420px, 92vw);
      padding: 22px;
    }

    dialog::backdrop {
      background: rgba(0, 0, 0, 0.3);
    }

    dialog label {
      display: block;
      font-size: 0.9rem;
      font-weight: 500;
      margin-top: 12px;
    }

    dialog input,
    dialog textarea {
      width: 100%;
      margin-top: 4px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.25);
      padding: 8px 10px;
      font: inherit;
    }

    dialog textarea {
      min-height: 90px;
    }

    .dialog-actions {
      margin-top: 16px;
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    .dialog-actions div {
      display: flex;
      gap: 8px;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Activity Calendar</h1>
      <div>
        <button id="save" class="primary" type="button">Save</button>
        <span id="status" class="status" aria-live="polite"></span>
      </div>
    </header>

    <section>
      <div class="month-bar">
        <button id="prev" type="button">&larr; Prev</button>
        <h2 id="month-title">{{TITLE}}</h2>
        <button id="next" type="button">Next &rarr;</button>
      </div>
    </section>

    <section>
      <div id="weekdays" class="weekdays"></div>
      <div id="grid" class="grid"></div>
    </section>

    <p class="hint">Click a day you trained. You'll be asked what workout it was and a short note. Data saves automatically; Save writes it out right away.</p>
  </main>

  <dialog id="editor">
    <form method="dialog" id="editor-form">
      <div id="editor-title" class="hint"></div>
      <label for="label">What workout was it?</label>
      <input id="label" name="label" placeholder="Workout A, Workout B, Tennis" />
      <label for="note">Small note</label>
      <textarea id="note" name="note" placeholder="How it felt, PRs, anything"></textarea>
      <div class="dialog-actions">
        <div>
          <button id="cancel" type="button">Cancel</button>
          <button id="submit" class="primary" type="submit">Save</button>
        </div>
        <button id="clear" class="danger" type="button">Clear day</button>
      </div>
    </form>
  </dialog>

  <script>
    let calendar = {{INITIAL}};
    let editing = null;

    const gridEl = document.getElementById('grid');
    const weekdaysEl = document.getElementById('weekdays');
    const titleEl = document.getElementById('month-title');
    const statusEl = document.getElementById('status');
    const editor = document.getElementById('editor');
    const editorTitle = document.getElementById('editor-title');
    const labelInput = document.getElementById('label');
    const noteInput = document.getElementById('note');

    const setStatus = (message, tone) => {
      statusEl.textContent = message;
      statusEl.className = `status ${tone || ''}`.trim();
    };

    const flash = (message, tone) => {
      setStatus(message, tone);
      setTimeout(() => setStatus('', ''), 1200);
    };

    const request = async (method, url, body) => {
      const res = await fetch(url, {
        method,
        headers: body ? { 'content-type': 'application/json' } : {},
        body: body ? JSON.stringify(body) : undefined
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const render = () => {
      if (!calendar) {
        return;
      }
      titleEl.textContent = `${calendar.month_name} ${calendar.year}`;
      weekdaysEl.replaceChildren(
        ...calendar.weekdays.map((name) => {
          const el = document.createElement('div');
          el.textContent = name;
          return el;
        })
      );

      const cells = [];
      calendar.weeks.forEach((week) => {
        week.forEach((cell) => {
          const button = document.createElement('button');
          button.type = 'button';
          button.className = 'cell';
          button.disabled = !cell.in_month;

          const day = document.createElement('span');
          day.className = 'day';
          day.textContent = cell.day;
          button.appendChild(day);

          if (cell.entry) {
            const label = document.createElement('span');
            label.className = 'label';
            label.textContent = cell.entry.label;
            button.appendChild(label);
          }

          button.addEventListener('click', () => openEditor(cell));
          cells.push(button);
        });
      });
      gridEl.replaceChildren(...cells);
    };

    const openEditor = (cell) => {
      editing = cell.date_key;
      labelInput.value = cell.entry ? cell.entry.label : '';
      noteInput.value = cell.entry ? cell.entry.note : '';
      editorTitle.textContent = cell.title;
      editor.showModal();
    };

    const reload = async () => {
      calendar = await request('GET', '/api/calendar');
      render();
    };

    const navigate = async (direction) => {
      calendar = await request('POST', `/api/calendar/${direction}`);
      render();
    };

    document.getElementById('prev').addEventListener('click', () => {
      navigate('prev').catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('next').addEventListener('click', () => {
      navigate('next').catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('cancel').addEventListener('click', () => {
      editing = null;
      editor.close();
    });

    document.getElementById('editor-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const dateKey = editing;
      editor.close();
      request('PUT', `/api/days/${dateKey}`, {
        label: labelInput.value.trim(),
        note: noteInput.value.trim()
      })
        .then(reload)
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('clear').addEventListener('click', () => {
      const dateKey = editing;
      editor.close();
      request('DELETE', `/api/days/${dateKey}`)
        .then(reload)
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('save').addEventListener('click', () => {
      request('POST', '/api/save')
        .then((res) => (res.saved ? flash('Saved', 'ok') : flash('Save failed', 'error')))
        .catch((err) => setStatus(err.message, 'error'));
    });

    render();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityLog, Entry, save_day};
    use crate::calendar::CalendarView;

    #[test]
    fn page_embeds_month_and_escapes_script_close() {
        let view = CalendarView::new(2025, 0).unwrap();
        let log = save_day(
            &ActivityLog::default(),
            "2025-01-15",
            Entry::new("</script><b>", ""),
        );
        let calendar = CalendarResponse::build(view, &view.grid(), &log);
        let html = render_index(&calendar);

        assert!(html.contains("January 2025"));
        assert!(html.contains("\"month_key\":\"2025-01\""));
        assert!(!html.contains("</script><b>"));
        assert!(!html.contains("{{INITIAL}}"));
        assert!(html.contains("\"title\":\"Wed, Jan 15, 2025\""));
    }
}
