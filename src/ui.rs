use crate::models::{PeriodStats, StatsResponse, Theme};
use crate::stats::format_amount;

pub fn render_index(user_name: &str, stats: &StatsResponse, theme: Theme) -> String {
    let periods = &stats.periods;
    INDEX_HTML
        .replace("{{THEME}}", theme_name(theme))
        .replace("{{TOTAL_LINKS}}", &stats.dashboard.total_links.to_string())
        .replace("{{MONTH_EXPENSES}}", &format_amount(stats.dashboard.month_expenses))
        .replace("{{MONTHLY_INCOME}}", &format_amount(periods.current_month.total_income))
        .replace("{{MONTHLY_EXPENSES}}", &format_amount(periods.current_month.total_expense))
        .replace("{{MONTHLY_SAVINGS}}", &savings_cell(&periods.current_month))
        .replace("{{LAST_MONTH_SAVINGS}}", &savings_cell(&periods.previous_month))
        .replace("{{YEARLY_INCOME}}", &format_amount(periods.current_year.total_income))
        .replace("{{YEARLY_EXPENSES}}", &format_amount(periods.current_year.total_expense))
        .replace("{{YEARLY_SAVINGS}}", &savings_cell(&periods.current_year))
        .replace("{{LAST_YEAR_SAVINGS}}", &savings_cell(&periods.previous_year))
        .replace("{{USER}}", &html_escape(user_name))
}

fn savings_cell(period: &PeriodStats) -> String {
    let class = if period.positive {
        "savings-positive"
    } else {
        "savings-negative"
    };
    format!(r#"<span class="{class}">{}</span>"#, format_amount(period.savings))
}

fn theme_name(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub const LOGIN_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Dashboard · Sign in</title>
  <style>
    body { margin: 0; min-height: 100vh; display: grid; place-items: center;
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif; background: #f1f5f9; color: #0f172a; }
    .card { background: #fff; border-radius: 20px; padding: 32px; width: min(380px, 92vw);
      box-shadow: 0 20px 50px rgba(15, 23, 42, 0.12); display: grid; gap: 14px; }
    input, button { font: inherit; padding: 10px 12px; border-radius: 10px; border: 1px solid #cbd5e1; }
    button { background: #6366f1; color: #fff; border: none; cursor: pointer; }
    .switch { background: none; color: #6366f1; }
    .error { color: #ef4444; min-height: 1.2em; margin: 0; }
    form { display: grid; gap: 10px; }
    [hidden] { display: none; }
  </style>
</head>
<body>
  <div class="card">
    <h1 id="heading">Sign in</h1>
    <form id="loginForm">
      <input id="loginEmail" type="email" placeholder="Email" required />
      <input id="loginPassword" type="password" placeholder="Password" required />
      <button type="submit">Sign in</button>
    </form>
    <form id="signupForm" hidden>
      <input id="name" placeholder="Name" required />
      <input id="email" type="email" placeholder="Email" required />
      <input id="password" type="password" placeholder="Password" required />
      <input id="confirmPassword" type="password" placeholder="Confirm password" required />
      <button type="submit">Create account</button>
    </form>
    <p class="error" id="error"></p>
    <button class="switch" id="switch" type="button">Need an account? Sign up</button>
  </div>
  <script>
    const loginForm = document.getElementById('loginForm');
    const signupForm = document.getElementById('signupForm');
    const error = document.getElementById('error');

    document.getElementById('switch').addEventListener('click', (event) => {
      const signingUp = signupForm.hidden;
      signupForm.hidden = !signingUp;
      loginForm.hidden = signingUp;
      document.getElementById('heading').textContent = signingUp ? 'Create account' : 'Sign in';
      event.target.textContent = signingUp ? 'Have an account? Sign in' : 'Need an account? Sign up';
      error.textContent = '';
    });

    async function submit(url, body) {
      const response = await fetch(url, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body),
      });
      if (response.ok) {
        window.location.href = '/';
      } else {
        error.textContent = await response.text();
      }
    }

    loginForm.addEventListener('submit', (event) => {
      event.preventDefault();
      submit('/api/auth/login', {
        email: document.getElementById('loginEmail').value,
        password: document.getElementById('loginPassword').value,
      });
    });

    signupForm.addEventListener('submit', (event) => {
      event.preventDefault();
      submit('/api/auth/signup', {
        name: document.getElementById('name').value,
        email: document.getElementById('email').value,
        password: document.getElementById('password').value,
        confirmPassword: document.getElementById('confirmPassword').value,
      });
    });
  </script>
</body>
</html>
"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Dashboard</title>
  <style>
    :root { --bg: #f1f5f9; --card: #ffffff; --ink: #0f172a; --muted: #64748b; --accent: #6366f1;
      --good: #10b981; --bad: #ef4444; }
    body[data-theme="dark"] { --bg: #0f172a; --card: #1e293b; --ink: #e2e8f0; --muted: #94a3b8; }
    * { box-sizing: border-box; }
    body { margin: 0; background: var(--bg); color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif; }
    header { display: flex; justify-content: space-between; align-items: center; padding: 18px 28px; }
    nav { display: flex; gap: 8px; }
    nav button, .btn { font: inherit; border: none; border-radius: 10px; padding: 8px 14px; cursor: pointer;
      background: var(--card); color: var(--ink); }
    nav button.active, .btn.primary { background: var(--accent); color: #fff; }
    main { padding: 0 28px 40px; display: grid; gap: 20px; }
    .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 14px; }
    .card { background: var(--card); border-radius: 16px; padding: 18px; }
    .label { color: var(--muted); font-size: 0.85rem; }
    .value { font-size: 1.4rem; font-weight: 600; }
    .savings-positive { color: var(--good); }
    .savings-negative { color: var(--bad); }
    .tab { display: none; }
    .tab.active { display: grid; gap: 16px; }
    form { display: flex; flex-wrap: wrap; gap: 8px; }
    input, select { font: inherit; padding: 8px 10px; border-radius: 8px; border: 1px solid #cbd5e1; }
    .row { display: flex; justify-content: space-between; align-items: center; padding: 8px 0;
      border-bottom: 1px solid rgba(100, 116, 139, 0.2); gap: 10px; }
    .income { color: var(--good); }
    .expense { color: var(--bad); }
    .bar { height: 8px; background: var(--accent); border-radius: 4px; }
    .links { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 12px; }
    .pinned { outline: 2px solid var(--accent); }
    .preview { width: 100%; height: 120px; object-fit: cover; border-radius: 10px; background: var(--bg); }
  </style>
</head>
<body data-theme="{{THEME}}">
  <header>
    <div><strong>Dashboard</strong> · <span class="label">{{USER}}</span></div>
    <nav>
      <button data-tab="links" class="active">Links</button>
      <button data-tab="expenses">Expenses</button>
      <button data-tab="weather">Weather</button>
      <button id="themeToggle">Theme</button>
      <button id="logout">Log out</button>
    </nav>
  </header>
  <main>
    <section class="grid">
      <div class="card"><div class="label">Saved links</div><div class="value" id="totalLinks">{{TOTAL_LINKS}}</div></div>
      <div class="card"><div class="label">Spent this month</div><div class="value" id="monthExpenses">{{MONTH_EXPENSES}}</div></div>
    </section>

    <section class="tab active" id="links-tab">
      <form id="linkForm">
        <input name="title" placeholder="Title" />
        <input name="url" placeholder="URL" />
        <input name="image" placeholder="Image URL (optional)" />
        <button class="btn primary">Add link</button>
      </form>
      <div class="links" id="linksContainer"></div>
    </section>

    <section class="tab" id="expenses-tab">
      <div class="grid">
        <div class="card"><div class="label">Monthly income</div><div class="value" id="monthlyIncome">{{MONTHLY_INCOME}}</div></div>
        <div class="card"><div class="label">Monthly expenses</div><div class="value" id="monthlyExpenses">{{MONTHLY_EXPENSES}}</div></div>
        <div class="card"><div class="label">Monthly savings</div><div class="value" id="monthlySavings">{{MONTHLY_SAVINGS}}</div></div>
        <div class="card"><div class="label">Last month savings</div><div class="value" id="lastMonthSavings">{{LAST_MONTH_SAVINGS}}</div></div>
        <div class="card"><div class="label">Yearly income</div><div class="value" id="yearlyIncome">{{YEARLY_INCOME}}</div></div>
        <div class="card"><div class="label">Yearly expenses</div><div class="value" id="yearlyExpenses">{{YEARLY_EXPENSES}}</div></div>
        <div class="card"><div class="label">Yearly savings</div><div class="value" id="yearlySavings">{{YEARLY_SAVINGS}}</div></div>
        <div class="card"><div class="label">Last year savings</div><div class="value" id="lastYearSavings">{{LAST_YEAR_SAVINGS}}</div></div>
      </div>
      <div class="card">
        <form id="expenseForm">
          <input name="title" placeholder="Expense" />
          <input name="amount" type="number" step="0.01" placeholder="Amount" />
          <select name="category">
            <option value="">Category</option><option>Food</option><option>Transport</option>
            <option>Shopping</option><option>Bills</option><option>Entertainment</option><option>Other</option>
          </select>
          <select name="paymentMode">
            <option value="">Payment mode</option><option>Cash</option><option>Card</option><option>UPI</option>
          </select>
          <input name="date" type="date" />
          <button class="btn primary" id="expenseSubmit">Add expense</button>
        </form>
      </div>
      <div class="card">
        <form id="incomeForm">
          <input name="title" placeholder="Income" />
          <input name="amount" type="number" step="0.01" placeholder="Amount" />
          <select name="category">
            <option value="">Category</option><option>Salary</option><option>Freelance</option>
            <option>Investment</option><option>Other</option>
          </select>
          <input name="date" type="date" />
          <button class="btn primary">Add income</button>
        </form>
      </div>
      <div class="grid">
        <div class="card"><div class="label">Expenses by category</div><div id="expenseChart"></div></div>
        <div class="card"><div class="label">Income by category</div><div id="incomeChart"></div></div>
      </div>
      <div class="card">
        <div class="row">
          <strong>Transactions</strong>
          <span>
            <a class="btn" href="/api/expenses/export">Export CSV</a>
            <button class="btn" id="resetExpenses">Reset expenses</button>
          </span>
        </div>
        <div id="transactionsList"></div>
      </div>
    </section>

    <section class="tab" id="weather-tab">
      <form id="weatherForm">
        <input name="city" placeholder="City" />
        <button class="btn primary">Search</button>
        <span id="quickCities"></span>
      </form>
      <div class="card" id="weatherCard"></div>
    </section>
  </main>
  <script>
    const money = (value) => `₹${value.toFixed(2)}`;
    const esc = (text) => String(text).replace(/[&<>"']/g, (c) => `&#${c.charCodeAt(0)};`);
    let editingExpense = null;

    async function api(url, options = {}) {
      const response = await fetch(url, {
        headers: { 'Content-Type': 'application/json' },
        ...options,
      });
      if (response.status === 401) {
        window.location.href = '/login';
        return null;
      }
      if (!response.ok) {
        alert(await response.text());
        return null;
      }
      return response.status === 204 ? {} : response.json();
    }

    function savings(id, period) {
      const el = document.getElementById(id);
      el.innerHTML = `<span class="${period.positive ? 'savings-positive' : 'savings-negative'}">${money(period.savings)}</span>`;
    }

    function bars(id, totals) {
      const max = Math.max(1, ...totals.map((t) => t.amount));
      document.getElementById(id).innerHTML = totals.map((t) => `
        <div class="row"><span>${esc(t.category)}</span><span>${money(t.amount)}</span></div>
        <div class="bar" style="width:${(t.amount / max) * 100}%"></div>`).join('');
    }

    async function refreshStats() {
      const stats = await api('/api/stats');
      if (!stats) return;
      const p = stats.periods;
      document.getElementById('totalLinks').textContent = stats.dashboard.totalLinks;
      document.getElementById('monthExpenses').textContent = money(stats.dashboard.monthExpenses);
      document.getElementById('monthlyIncome').textContent = money(p.currentMonth.totalIncome);
      document.getElementById('monthlyExpenses').textContent = money(p.currentMonth.totalExpense);
      document.getElementById('yearlyIncome').textContent = money(p.currentYear.totalIncome);
      document.getElementById('yearlyExpenses').textContent = money(p.currentYear.totalExpense);
      savings('monthlySavings', p.currentMonth);
      savings('lastMonthSavings', p.previousMonth);
      savings('yearlySavings', p.currentYear);
      savings('lastYearSavings', p.previousYear);
      bars('expenseChart', stats.expenseCategories);
      bars('incomeChart', stats.incomeCategories);
    }

    function hostOf(url) {
      try {
        return new URL(url).hostname;
      } catch {
        return url;
      }
    }

    const faviconUrl = (url) =>
      `https://www.google.com/s2/favicons?domain=${encodeURIComponent(hostOf(url))}&sz=64`;
    const previewImage = (link) => link.image || faviconUrl(link.url);

    async function renderLinks() {
      const links = await api('/api/links');
      if (!links) return;
      document.getElementById('linksContainer').innerHTML = links.map((link) => `
        <div class="card ${link.pinned ? 'pinned' : ''}">
          <img class="preview" src="${esc(previewImage(link))}" alt="${esc(link.title)}"
            onerror="this.onerror=null; this.src='${esc(faviconUrl(link.url))}'" />
          <a href="${esc(link.url)}" target="_blank">${esc(link.title)}</a>
          <div class="label">${esc(hostOf(link.url))}</div>
          <button class="btn" onclick="togglePin('${link.id}')">${link.pinned ? 'Unpin' : 'Pin'}</button>
          <button class="btn" onclick="deleteLink('${link.id}')">Delete</button>
        </div>`).join('');
      refreshStats();
    }

    async function renderTransactions() {
      const txns = await api('/api/transactions');
      if (!txns) return;
      document.getElementById('transactionsList').innerHTML = txns.map((t) => `
        <div class="row">
          <span>${esc(t.title)} <span class="label">${esc(t.category)} · ${esc(t.date)}</span></span>
          <span class="${t.type}">${t.type === 'income' ? '+' : '-'}${money(t.amount)}
            ${t.type === 'expense' ? `<button class="btn" onclick="editExpense('${t.id}')">Edit</button>` : ''}
            <button class="btn" onclick="deleteTransaction('${t.type}', '${t.id}')">Delete</button>
          </span>
        </div>`).join('');
    }

    async function refreshLedger() {
      await Promise.all([renderTransactions(), refreshStats()]);
    }

    async function togglePin(id) {
      if (await api(`/api/links/${id}/pin`, { method: 'POST' })) renderLinks();
    }

    async function deleteLink(id) {
      if (!confirm('Delete this link?')) return;
      if (await api(`/api/links/${id}?confirm=true`, { method: 'DELETE' })) renderLinks();
    }

    async function deleteTransaction(type, id) {
      if (!confirm(`Are you sure you want to delete this ${type}?`)) return;
      const path = type === 'income' ? 'incomes' : 'expenses';
      if (await api(`/api/${path}/${id}?confirm=true`, { method: 'DELETE' })) refreshLedger();
    }

    async function editExpense(id) {
      const expenses = await api('/api/expenses');
      const expense = expenses && expenses.find((e) => e.id === id);
      if (!expense) return;
      const form = document.getElementById('expenseForm');
      for (const field of ['title', 'amount', 'category', 'paymentMode', 'date']) {
        form.elements[field].value = expense[field];
      }
      editingExpense = id;
      document.getElementById('expenseSubmit').textContent = 'Save expense';
    }

    function formJson(form) {
      const data = Object.fromEntries(new FormData(form));
      if ('amount' in data) data.amount = data.amount === '' ? null : parseFloat(data.amount);
      return data;
    }

    document.getElementById('linkForm').addEventListener('submit', async (event) => {
      event.preventDefault();
      if (await api('/api/links', { method: 'POST', body: JSON.stringify(formJson(event.target)) })) {
        event.target.reset();
        renderLinks();
      }
    });

    document.getElementById('expenseForm').addEventListener('submit', async (event) => {
      event.preventDefault();
      const body = JSON.stringify(formJson(event.target));
      const saved = editingExpense
        ? await api(`/api/expenses/${editingExpense}`, { method: 'PUT', body })
        : await api('/api/expenses', { method: 'POST', body });
      if (saved) {
        editingExpense = null;
        document.getElementById('expenseSubmit').textContent = 'Add expense';
        event.target.reset();
        refreshLedger();
      }
    });

    document.getElementById('incomeForm').addEventListener('submit', async (event) => {
      event.preventDefault();
      if (await api('/api/incomes', { method: 'POST', body: JSON.stringify(formJson(event.target)) })) {
        event.target.reset();
        refreshLedger();
      }
    });

    document.getElementById('resetExpenses').addEventListener('click', async () => {
      if (!confirm('Are you sure you want to reset all expense data? This cannot be undone.')) return;
      if (await api('/api/expenses?confirm=true', { method: 'DELETE' })) refreshLedger();
    });

    async function showWeather(city) {
      const card = document.getElementById('weatherCard');
      card.style.opacity = 0.3;
      const report = await api(`/api/weather?city=${encodeURIComponent(city)}`);
      setTimeout(() => {
        card.style.opacity = 1;
        if (!report) return;
        card.innerHTML = `
          <img src="${esc(report.iconUrl)}" alt="" />
          <div class="value">${report.temperatureC}°C · ${esc(report.city)}</div>
          <div>${esc(report.condition)}</div>
          <div class="label">Humidity ${report.humidity}% · Wind ${report.windKph} km/h · Feels like ${report.feelsLikeC}°C</div>`;
      }, 300);
    }

    document.getElementById('weatherForm').addEventListener('submit', (event) => {
      event.preventDefault();
      const city = event.target.elements.city.value.trim();
      if (city) showWeather(city);
      event.target.reset();
    });

    async function renderQuickCities() {
      const cities = await api('/api/weather/cities');
      if (!cities) return;
      document.getElementById('quickCities').innerHTML = cities
        .map((city) => `<button type="button" class="btn" onclick="showWeather('${esc(city)}')">${esc(city)}</button>`)
        .join('');
      return cities;
    }

    const tabs = {
      links: () => renderLinks(),
      expenses: () => refreshLedger(),
      weather: async () => {
        const cities = await renderQuickCities();
        if (cities && cities.length) showWeather(cities[0]);
      },
    };

    document.querySelectorAll('nav button[data-tab]').forEach((button) => {
      button.addEventListener('click', () => {
        document.querySelectorAll('nav button[data-tab]').forEach((b) => b.classList.remove('active'));
        document.querySelectorAll('.tab').forEach((t) => t.classList.remove('active'));
        button.classList.add('active');
        document.getElementById(`${button.dataset.tab}-tab`).classList.add('active');
        tabs[button.dataset.tab]();
      });
    });

    document.getElementById('themeToggle').addEventListener('click', async () => {
      const result = await api('/api/theme/toggle', { method: 'POST' });
      if (result) document.body.dataset.theme = result.theme;
    });

    document.getElementById('logout').addEventListener('click', async () => {
      await api('/api/auth/logout', { method: 'POST' });
      window.location.href = '/login';
    });

    renderLinks();
  </script>
</body>
</html>
"#;
