use crate::form::{MemberRoster, PERMANENT_MEMBERS};
use crate::grid::{CellState, Grid, CLOSE_HOUR, DAYS, OPEN_HOUR, SLOTS_PER_HOUR};
use crate::models::Session;

pub fn render_index(session: &Session) -> String {
    INDEX_HTML
        .replace("{{MEMBER_ROWS}}", &render_member_rows(&session.members))
        .replace("{{DAY_SECTIONS}}", &render_day_sections(&session.grid))
        .replace(
            "{{BRUSH_MAJORITY_ACTIVE}}",
            active_class(session.brush, CellState::MajorityAvailable),
        )
        .replace(
            "{{BRUSH_ALL_ACTIVE}}",
            active_class(session.brush, CellState::AllAvailable),
        )
        .replace(
            "{{BRUSH_ERASER_ACTIVE}}",
            active_class(session.brush, CellState::Unmarked),
        )
}

pub fn render_success() -> String {
    SUCCESS_HTML.to_string()
}

fn active_class(brush: CellState, button: CellState) -> &'static str {
    if brush == button { " active" } else { "" }
}

fn state_class(state: CellState) -> &'static str {
    match state {
        CellState::Unmarked => "unmarked",
        CellState::MajorityAvailable => "majority_available",
        CellState::AllAvailable => "all_available",
    }
}

fn render_member_rows(roster: &MemberRoster) -> String {
    let mut out = String::new();
    for (index, name) in roster.names().iter().enumerate() {
        let remove = if index >= PERMANENT_MEMBERS {
            format!(
                r#"<button class="member-remove" data-index="{index}" type="button" title="Remove">&times;</button>"#
            )
        } else {
            String::new()
        };
        out.push_str(&format!(
            r#"<div class="member">
  <label for="member{n}">Member {n}</label>
  <div class="member-line">
    <input id="member{n}" class="member-input" data-index="{index}" value="{value}" placeholder="Enter a name" />
    {remove}
  </div>
</div>
"#,
            n = index + 1,
            value = html_escape(name),
        ));
    }
    out
}

fn render_day_sections(grid: &Grid) -> String {
    let mut out = String::new();
    for day in DAYS {
        let mut cells = String::new();
        for cell in grid.row(day) {
            let hour_start = if cell.index % SLOTS_PER_HOUR == 0 {
                " hour-start"
            } else {
                ""
            };
            let label = cell
                .label
                .map(|text| format!(r#"<span class="cell-label">{text}</span>"#))
                .unwrap_or_default();
            cells.push_str(&format!(
                r#"<div class="cell {state}{hour_start}" data-day="{day}" data-index="{index}">{label}</div>"#,
                state = state_class(cell.state),
                index = cell.index,
            ));
        }

        let ticks: String = (OPEN_HOUR..=CLOSE_HOUR)
            .map(|hour| format!("<span>{hour:02}:00</span>"))
            .collect();

        out.push_str(&format!(
            r#"<section class="day">
  <h3>Day {day}</h3>
  <div class="day-row" data-day="{day}">{cells}</div>
  <div class="ticks">{ticks}</div>
</section>
"#
        ));
    }
    out
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Band Registration</title>
  <style>
    :root {
      --bg-1: #f6f1e7;
      --bg-2: #e7e0f5;
      --ink: #27242e;
      --accent: #8b5cf6;
      --accent-2: #fb923c;
      --muted: #6e6878;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 20px 50px rgba(54, 42, 88, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top right, var(--bg-2), transparent 55%),
        linear-gradient(150deg, var(--bg-1), #fdf8ef 65%, #f3ecf9 100%);
      color: var(--ink);
      font-family: "Avenir Next", "Segoe UI", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 36px 20px 56px;
    }

    .app {
      width: min(1100px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 34px;
      display: grid;
      gap: 26px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.7rem, 3.5vw, 2.4rem);
    }

    .columns {
      display: grid;
      grid-template-columns: 280px 1fr;
      gap: 34px;
    }

    label {
      display: block;
      font-size: 0.85rem;
      font-weight: 600;
      letter-spacing: 0.04em;
      color: var(--muted);
      margin-bottom: 4px;
    }

    input, select {
      width: 100%;
      padding: 9px 11px;
      border: 1px solid rgba(54, 42, 88, 0.18);
      border-radius: 10px;
      font-size: 0.95rem;
      background: white;
    }

    .field {
      margin-bottom: 16px;
    }

    .duration {
      display: flex;
      align-items: center;
      gap: 8px;
      margin-bottom: 16px;
    }

    .duration label {
      margin: 0;
      white-space: nowrap;
    }

    .duration select {
      width: auto;
    }

    .member-line {
      display: flex;
      align-items: center;
      gap: 8px;
    }

    .member {
      margin-bottom: 12px;
    }

    .member-remove {
      border: none;
      background: rgba(54, 42, 88, 0.08);
      border-radius: 8px;
      width: 32px;
      height: 32px;
      font-size: 1rem;
      cursor: pointer;
      color: var(--muted);
    }

    .member-remove:hover {
      background: rgba(54, 42, 88, 0.16);
    }

    button {
      font: inherit;
    }

    .btn {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 11px 18px;
      font-weight: 600;
      cursor: pointer;
      transition: transform 120ms ease, box-shadow 120ms ease;
    }

    .btn:active {
      transform: scale(0.98);
    }

    .btn-add {
      width: 100%;
      background: var(--ink);
      color: white;
    }

    .grid-title {
      margin: 0 0 4px;
      font-size: 1.25rem;
    }

    .day h3 {
      margin: 0 0 6px;
      font-size: 1rem;
      color: var(--muted);
    }

    .day-row {
      display: flex;
      height: 36px;
      background: #f3f1f6;
      border-radius: 4px;
      user-select: none;
      margin-top: 14px;
    }

    .cell {
      flex: 1;
      position: relative;
      cursor: crosshair;
    }

    .cell.unmarked {
      background: #f3f1f6;
    }

    .cell.majority_available {
      background: var(--accent);
    }

    .cell.all_available {
      background: var(--accent-2);
    }

    .cell.hour-start {
      border-left: 1px solid rgba(54, 42, 88, 0.22);
    }

    .cell-label {
      position: absolute;
      bottom: 100%;
      left: 0;
      transform: translateX(-50%);
      font-size: 9px;
      color: var(--muted);
      pointer-events: none;
      white-space: nowrap;
    }

    .ticks {
      display: flex;
      justify-content: space-between;
      font-size: 0.72rem;
      color: var(--muted);
      margin-top: 4px;
    }

    .day {
      margin-bottom: 18px;
    }

    .brushes {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }

    .brush {
      flex: 1;
      min-width: 150px;
      border: 1px solid rgba(54, 42, 88, 0.18);
      background: white;
      border-radius: 12px;
      padding: 10px 14px;
      cursor: pointer;
      font-weight: 600;
    }

    .brush .swatch {
      display: inline-block;
      width: 12px;
      height: 12px;
      border-radius: 3px;
      margin-right: 8px;
      vertical-align: -1px;
      background: #f3f1f6;
      border: 1px solid rgba(54, 42, 88, 0.18);
    }

    .brush[data-brush="majority_available"] .swatch {
      background: var(--accent);
      border: none;
    }

    .brush[data-brush="all_available"] .swatch {
      background: var(--accent-2);
      border: none;
    }

    .brush.active {
      border-color: var(--ink);
      box-shadow: inset 0 0 0 1px var(--ink);
    }

    .submit-row {
      display: flex;
      justify-content: flex-end;
      margin-top: 16px;
    }

    .btn-submit {
      background: #fde68a;
      color: var(--ink);
      box-shadow: 0 10px 22px rgba(217, 170, 14, 0.3);
    }

    .errors {
      margin: 10px 0 0;
      padding-left: 20px;
      color: #c63b2b;
      font-size: 0.92rem;
    }

    .status {
      min-height: 1.2em;
      font-size: 0.9rem;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    @media (max-width: 760px) {
      .columns {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Band Registration</h1>
    </header>

    <div class="columns">
      <div>
        <div class="field">
          <label for="bandName">Band name</label>
          <input id="bandName" placeholder="Enter a band name" />
        </div>

        <div class="duration">
          <label for="performanceTime">Performance time</label>
          <select id="performanceTime">
            <option value="">--</option>
            <option value="3">3 min</option>
            <option value="4">4 min</option>
            <option value="5">5 min</option>
            <option value="6">6 min</option>
            <option value="7">7 min</option>
            <option value="8">8 min</option>
            <option value="9">9 min</option>
            <option value="10">10 min</option>
          </select>
        </div>

        <div class="field">
          <label for="bandmaster">Band leader</label>
          <input id="bandmaster" placeholder="Enter a name" />
        </div>

        <div id="members">
{{MEMBER_ROWS}}
        </div>

        <button id="add-member" class="btn btn-add" type="button">Add a member</button>
      </div>

      <div>
        <h2 class="grid-title">Available performance times</h2>
        <div id="days">
{{DAY_SECTIONS}}
        </div>

        <div class="brushes">
          <button class="brush{{BRUSH_MAJORITY_ACTIVE}}" data-brush="majority_available" type="button">
            <span class="swatch"></span>Most can make it
          </button>
          <button class="brush{{BRUSH_ALL_ACTIVE}}" data-brush="all_available" type="button">
            <span class="swatch"></span>Everyone can make it
          </button>
          <button class="brush{{BRUSH_ERASER_ACTIVE}}" data-brush="unmarked" type="button">
            <span class="swatch"></span>Eraser
          </button>
        </div>

        <div class="submit-row">
          <button id="register" class="btn btn-submit" type="button">Register</button>
        </div>
        <ul class="errors" id="errors"></ul>
        <div class="status" id="status"></div>
      </div>
    </div>
  </main>

  <script>
    const SLOTS_PER_HOUR = 12;
    const membersEl = document.getElementById('members');
    const errorsEl = document.getElementById('errors');
    const statusEl = document.getElementById('status');
    let dragging = false;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const send = async (method, url, body) => {
      const res = await fetch(url, {
        method,
        headers: body === undefined ? {} : { 'content-type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body)
      });
      if (!res.ok) {
        throw new Error(await res.text() || 'Request failed');
      }
      return res.json();
    };

    const repaintRow = (day, cells) => {
      const row = document.querySelector(`.day-row[data-day="${day}"]`);
      for (const cell of cells) {
        const el = row.children[cell.index];
        el.className = `cell ${cell.state}` + (cell.index % SLOTS_PER_HOUR === 0 ? ' hour-start' : '');
        el.innerHTML = cell.label ? `<span class="cell-label">${cell.label}</span>` : '';
      }
    };

    const pointer = (action, day, index) => {
      send('POST', '/api/pointer', { action, day, index })
        .then((data) => {
          if (data.row) {
            repaintRow(data.row.day, data.row.cells);
          }
        })
        .catch((err) => setStatus(err.message, 'error'));
    };

    document.querySelectorAll('.day-row').forEach((row) => {
      row.addEventListener('mousedown', (event) => {
        const cell = event.target.closest('.cell');
        if (!cell) return;
        event.preventDefault();
        dragging = true;
        pointer('down', Number(cell.dataset.day), Number(cell.dataset.index));
      });
      row.addEventListener('mouseover', (event) => {
        if (!dragging) return;
        const cell = event.target.closest('.cell');
        if (!cell) return;
        pointer('enter', Number(cell.dataset.day), Number(cell.dataset.index));
      });
    });

    document.addEventListener('mouseup', () => {
      if (!dragging) return;
      dragging = false;
      pointer('up');
    });

    document.querySelectorAll('.brush').forEach((button) => {
      button.addEventListener('click', () => {
        send('POST', '/api/brush', { brush: button.dataset.brush })
          .then((data) => {
            document.querySelectorAll('.brush').forEach((b) => {
              b.classList.toggle('active', b.dataset.brush === data.brush);
            });
          })
          .catch((err) => setStatus(err.message, 'error'));
      });
    });

    const escapeHtml = (value) =>
      value
        .replaceAll('&', '&amp;')
        .replaceAll('<', '&lt;')
        .replaceAll('>', '&gt;')
        .replaceAll('"', '&quot;');

    const renderMembers = (members) => {
      membersEl.innerHTML = members
        .map((name, index) => {
          const n = index + 1;
          const remove = index >= 2
            ? `<button class="member-remove" data-index="${index}" type="button" title="Remove">&times;</button>`
            : '';
          return `<div class="member">
  <label for="member${n}">Member ${n}</label>
  <div class="member-line">
    <input id="member${n}" class="member-input" data-index="${index}" value="${escapeHtml(name)}" placeholder="Enter a name" />
    ${remove}
  </div>
</div>`;
        })
        .join('\n');
    };

    membersEl.addEventListener('change', (event) => {
      const input = event.target.closest('.member-input');
      if (!input) return;
      send('PUT', `/api/members/${input.dataset.index}`, { name: input.value })
        .catch((err) => setStatus(err.message, 'error'));
    });

    membersEl.addEventListener('click', (event) => {
      const button = event.target.closest('.member-remove');
      if (!button) return;
      send('DELETE', `/api/members/${button.dataset.index}`)
        .then((data) => renderMembers(data.members))
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('add-member').addEventListener('click', () => {
      send('POST', '/api/members')
        .then((data) => renderMembers(data.members))
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('register').addEventListener('click', () => {
      const body = {
        band_name: document.getElementById('bandName').value,
        performance_time: document.getElementById('performanceTime').value,
        bandmaster: document.getElementById('bandmaster').value
      };
      setStatus('Submitting...', '');
      send('POST', '/api/submit', body)
        .then((data) => {
          errorsEl.innerHTML = '';
          if (data.ok) {
            window.location.href = data.redirect;
            return;
          }
          setStatus('', '');
          errorsEl.innerHTML = data.errors
            .map((message) => `<li>${escapeHtml(message)}</li>`)
            .join('');
        })
        .catch((err) => setStatus(err.message, 'error'));
    });
  </script>
</body>
</html>
"#;

const SUCCESS_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Registration Complete</title>
  <style>
    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(150deg, #f6f1e7, #f3ecf9);
      color: #27242e;
      font-family: "Avenir Next", "Segoe UI", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 24px;
    }

    .card {
      background: rgba(255, 255, 255, 0.92);
      border-radius: 24px;
      box-shadow: 0 20px 50px rgba(54, 42, 88, 0.16);
      padding: 44px 52px;
      text-align: center;
      display: grid;
      gap: 14px;
    }

    h1 {
      margin: 0;
      font-size: 1.8rem;
    }

    p {
      margin: 0;
      color: #6e6878;
    }

    a {
      color: #8b5cf6;
      font-weight: 600;
    }
  </style>
</head>
<body>
  <main class="card">
    <h1>Registration complete!</h1>
    <p>Your band and its available times have been recorded.</p>
    <a href="/">Register another band</a>
  </main>
</body>
</html>
"#;
