pub fn render_index(date: &str) -> String {
    page("Activity Ledger", &INDEX_BODY.replace("{{DATE}}", &escape_html(date)))
}

pub fn render_admin() -> String {
    page("Activity Ledger · Admin", ADMIN_BODY)
}

/// Shown in place of the board when the ledger could not be loaded.
pub fn render_failure(message: &str) -> String {
    page(
        "Activity Ledger",
        &FAILURE_BODY.replace("{{MESSAGE}}", &escape_html(message)),
    )
}

fn page(title: &str, body: &str) -> String {
    PAGE_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{BODY}}", body)
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --gain: #2f7d4a;
      --loss: #c8402c;
      --accent-2: #2f4858;
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
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat, .card {
      background: white;
      border-radius: 18px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .stat .label {
      display: block;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .value.negative {
      color: var(--loss);
    }

    .card {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
      margin-bottom: 10px;
    }

    .card.done {
      opacity: 0.7;
    }

    .badge {
      font-size: 0.75rem;
      border-radius: 999px;
      padding: 2px 8px;
      margin-left: 6px;
      background: #eee;
    }

    .badge.done_today { background: #d8f0df; }
    .badge.weekly_limit { background: #f7d9d4; }

    .bar {
      height: 6px;
      background: #eee;
      border-radius: 999px;
      margin-top: 6px;
    }

    .bar > div {
      height: 100%;
      border-radius: 999px;
      background: var(--gain);
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font-weight: 600;
      cursor: pointer;
    }

    button:disabled {
      opacity: 0.5;
      cursor: not-allowed;
    }

    .add-gain { background: var(--gain); color: white; }
    .add-loss { background: var(--loss); color: white; }
    .error { color: var(--loss); }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    td, th {
      text-align: left;
      padding: 6px;
      border-bottom: 1px solid #eee;
    }
  </style>
</head>
<body>
  <main class="app">
{{BODY}}
  </main>
</body>
</html>
"#;

const FAILURE_BODY: &str = r#"    <header>
      <h1>Connection error</h1>
    </header>
    <p class="error">{{MESSAGE}}</p>
    <p class="hint">Check that the data file is readable and restart the server.</p>
"#;

const INDEX_BODY: &str = r#"    <header>
      <h1>Activity Ledger</h1>
      <p><input type="date" id="date" value="{{DATE}}" /> <a href="/admin">Admin</a></p>
    </header>

    <section class="panel">
      <div class="stat"><span class="label">Week</span><span class="value" id="week">-</span></div>
      <div class="stat"><span class="label">Month</span><span class="value" id="month">-</span></div>
      <div class="stat"><span class="label">Monthly total</span><span class="value" id="total">-</span></div>
    </section>

    <section>
      <h2>Gains</h2>
      <div id="gains"></div>
      <h2>Losses</h2>
      <div id="losses"></div>
    </section>
    <p class="error" id="status"></p>

  <script>
    const dateEl = document.getElementById('date');
    const statusEl = document.getElementById('status');

    const esc = (value) => String(value).replace(/[&<>"']/g, (c) => ({
      '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
    })[c]);
    const fmt = (value) => Number(value).toFixed(2);

    const post = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body)
      });
      const data = await res.json().catch(() => ({}));
      if (!res.ok) {
        throw new Error(data.message || res.statusText);
      }
      return data;
    };

    const controlNote = (control) =>
      control.state === 'failed' ? `<div class="error">${esc(control.message)}</div>` : '';

    const render = (board) => {
      document.getElementById('week').textContent = board.week_label;
      document.getElementById('month').textContent = board.month_label;
      const total = document.getElementById('total');
      total.textContent = fmt(board.monthly_total);
      total.classList.toggle('negative', board.monthly_total < 0);

      document.getElementById('gains').innerHTML = board.gains.map((item) => {
        const blocked = item.status !== 'available' || item.control.state === 'pending';
        const badge = item.status === 'available' ? '' :
          `<span class="badge ${item.status}">${item.status === 'done_today' ? 'Done today' : 'Weekly max'}</span>`;
        return `<div class="card ${item.done_today ? 'done' : ''}">
          <div>
            <strong>${esc(item.name)}</strong>
            <span class="badge">${item.weekly_count}/${item.max_per_week}</span>${badge}
            <div>+ ${fmt(item.points)}</div>
            <div class="bar"><div style="width:${item.progress}%"></div></div>
            ${controlNote(item.control)}
          </div>
          <div>
            <button data-undo="${esc(item.id)}" title="Undo">&#8634;</button>
            <button class="add-gain" data-add="${esc(item.id)}" data-kind="gain" ${blocked ? 'disabled' : ''}>+</button>
          </div>
        </div>`;
      }).join('');

      document.getElementById('losses').innerHTML = board.losses.map((item) => {
        const blocked = item.control.state === 'pending';
        return `<div class="card">
          <div>
            <strong>${esc(item.name)}</strong>
            <div>- ${fmt(item.points)}</div>
            ${controlNote(item.control)}
          </div>
          <div>
            <button data-undo="${esc(item.id)}" title="Undo">&#8634;</button>
            <button class="add-loss" data-add="${esc(item.id)}" data-kind="loss" ${blocked ? 'disabled' : ''}>-</button>
          </div>
        </div>`;
      }).join('');
    };

    const refresh = async () => {
      const res = await fetch(`/api/board?date=${encodeURIComponent(dateEl.value)}`);
      const data = await res.json().catch(() => ({}));
      if (!res.ok) {
        document.querySelector('main').innerHTML =
          `<h1>Connection error</h1><p class="error">${esc(data.message || res.statusText)}</p>`;
        return;
      }
      statusEl.textContent = '';
      render(data);
    };

    document.addEventListener('click', async (event) => {
      const button = event.target.closest('button');
      if (!button) {
        return;
      }
      if (button.dataset.add) {
        button.disabled = true;
        try {
          await post('/api/events', {
            activity_id: button.dataset.add,
            kind: button.dataset.kind,
            date: dateEl.value
          });
        } catch (err) {
          alert(err.message);
        }
        await refresh();
      } else if (button.dataset.undo) {
        try {
          const plan = await post('/api/events/undo', { activity_id: button.dataset.undo });
          if (plan.status === 'confirm' && confirm(plan.prompt)) {
            await post('/api/events/undo', {
              activity_id: button.dataset.undo,
              event_id: plan.event_id,
              confirm: true
            });
          }
        } catch (err) {
          alert(err.message);
        }
        await refresh();
      }
    });

    dateEl.addEventListener('change', refresh);
    refresh().catch((err) => { statusEl.textContent = err.message; });
  </script>
"#;

const ADMIN_BODY: &str = r#"    <header>
      <h1>Activity catalog</h1>
      <p><a href="/">Back to ledger</a></p>
    </header>

    <section>
      <h2>Gains</h2>
      <table id="gains-table"><thead><tr><th>Name</th><th>Points</th><th>Max/week</th><th></th></tr></thead><tbody></tbody></table>
      <p>
        <input id="gain-name" placeholder="Name" />
        <input id="gain-points" placeholder="Points" />
        <input id="gain-max" placeholder="Max/week (7)" />
        <button data-new="gain">Add gain</button>
      </p>
    </section>

    <section>
      <h2>Losses</h2>
      <table id="losses-table"><thead><tr><th>Name</th><th>Points</th><th></th></tr></thead><tbody></tbody></table>
      <p>
        <input id="loss-name" placeholder="Name" />
        <input id="loss-points" placeholder="Points" />
        <button data-new="loss">Add loss</button>
      </p>
    </section>

    <p><button class="add-gain" id="save">Save everything</button> <span id="status"></span></p>

  <script>
    const statusEl = document.getElementById('status');
    const esc = (value) => String(value).replace(/[&<>"']/g, (c) => ({
      '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
    })[c]);

    const call = async (method, url, body) => {
      const res = await fetch(url, {
        method,
        headers: { 'Content-Type': 'application/json' },
        body: body ? JSON.stringify(body) : undefined
      });
      const data = await res.json().catch(() => ({}));
      if (!res.ok) {
        throw new Error(data.message || res.statusText);
      }
      return data;
    };

    let draftId = null;

    const render = (draft) => {
      draftId = draft.draft_id;
      document.querySelector('#gains-table tbody').innerHTML = draft.gains.map((item, index) =>
        `<tr><td>${esc(item.name)}</td><td>${Number(item.points).toFixed(2)}</td><td>${item.maxPerWeek}x</td>
         <td><button data-remove="gain" data-index="${index}">Delete</button></td></tr>`).join('');
      document.querySelector('#losses-table tbody').innerHTML = draft.losses.map((item, index) =>
        `<tr><td>${esc(item.name)}</td><td>-${Number(item.points).toFixed(2)}</td>
         <td><button data-remove="loss" data-index="${index}">Delete</button></td></tr>`).join('');
    };

    document.addEventListener('click', async (event) => {
      const button = event.target.closest('button');
      if (!button) {
        return;
      }
      try {
        if (button.dataset.new) {
          const kind = button.dataset.new;
          const body = {
            name: document.getElementById(`${kind}-name`).value,
            points: document.getElementById(`${kind}-points`).value
          };
          if (kind === 'gain') {
            body.max_per_week = document.getElementById('gain-max').value;
          }
          render(await call('POST', `/api/admin/drafts/${draftId}/activities/${kind}`, body));
          document.querySelectorAll('input').forEach((input) => { input.value = ''; });
        } else if (button.dataset.remove) {
          render(await call('DELETE', `/api/admin/drafts/${draftId}/activities/${button.dataset.remove}/${button.dataset.index}`));
        } else if (button.id === 'save') {
          button.disabled = true;
          statusEl.textContent = 'Saving...';
          await call('POST', `/api/admin/drafts/${draftId}/save`);
          statusEl.textContent = 'Saved.';
        }
      } catch (err) {
        statusEl.textContent = '';
        alert(err.message);
      } finally {
        button.disabled = false;
      }
    });

    call('POST', '/api/admin/drafts').then(render).catch((err) => { statusEl.textContent = err.message; });
  </script>
"#;
